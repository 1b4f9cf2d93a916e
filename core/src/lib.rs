use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

pub use adversary::*;
pub use cell::*;
pub use dice::*;
pub use error::*;
pub use grid::*;
pub use round::*;
pub use rules::*;
pub use scores::*;
pub use types::*;

mod adversary;
mod cell;
mod dice;
mod error;
mod grid;
mod reveal;
mod round;
mod rules;
mod scores;
mod types;

/// Which rule set a round is played with.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Plain minesweeper: reveal anywhere, no turns.
    #[default]
    Classic,
    /// The player walks the board while adversaries chase and shoot.
    Adversary,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub rules: AdversaryRules,
}

impl GameConfig {
    pub fn classic(size: Coord2, mines: CellCount) -> Self {
        Self {
            size,
            mines,
            mode: Mode::Classic,
            rules: AdversaryRules::default(),
        }
    }

    pub fn adversary(size: Coord2, mines: CellCount, rules: AdversaryRules) -> Self {
        Self {
            size,
            mines,
            mode: Mode::Adversary,
            rules,
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// Where the player stands, only in adversary mode.
    pub fn player_start(&self) -> Option<Coord2> {
        match self.mode {
            Mode::Classic => None,
            Mode::Adversary => Some(self.rules.player_start(self.size)),
        }
    }

    /// Checks the board shape and that the mines fit, leaving the player's cell free.
    ///
    /// Adversary rules are only checked in adversary mode.
    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(GameError::InvalidBoardSize);
        }

        let reserved = match self.player_start() {
            Some(start) if !in_bounds(start, self.size) => return Err(GameError::InvalidCoords),
            Some(_) => {
                self.rules.validate()?;
                1
            }
            None => 0,
        };
        if self.mines > self.total_cells() - reserved {
            return Err(GameError::TooManyMines);
        }

        Ok(())
    }
}

/// Leaderboard tier, with the board preset played at that tier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Secret,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::Secret];

    pub const BOARD_SIZE: Coord2 = (20, 30);

    pub const fn as_str(self) -> &'static str {
        use Difficulty::*;
        match self {
            Easy => "easy",
            Medium => "medium",
            Hard => "hard",
            Secret => "secret",
        }
    }

    pub const fn mines(self) -> CellCount {
        use Difficulty::*;
        match self {
            Easy => 60,
            Medium => 90,
            Hard => 120,
            Secret => 101,
        }
    }

    pub const fn mode(self) -> Mode {
        match self {
            Self::Secret => Mode::Adversary,
            _ => Mode::Classic,
        }
    }

    pub fn config(self) -> GameConfig {
        self.config_with_rules(AdversaryRules::default())
    }

    pub fn config_with_rules(self, rules: AdversaryRules) -> GameConfig {
        GameConfig {
            size: Self::BOARD_SIZE,
            mines: self.mines(),
            mode: self.mode(),
            rules,
        }
    }

    pub(crate) const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    /// Exact, case-sensitive tier names.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.as_str() == s)
            .ok_or(GameError::UnknownDifficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.config().validate(), Ok(()), "{difficulty}");
        }
        assert_eq!(Difficulty::Secret.config().mode, Mode::Adversary);
        assert_eq!(Difficulty::Hard.config().player_start(), None);
    }

    #[test]
    fn difficulty_names_are_exact() {
        assert_eq!("medium".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert_eq!("secret".parse::<Difficulty>(), Ok(Difficulty::Secret));
        assert_eq!("Easy".parse::<Difficulty>(), Err(GameError::UnknownDifficulty));
        assert_eq!("SecretGame".parse::<Difficulty>(), Err(GameError::UnknownDifficulty));
    }

    #[test]
    fn adversary_mode_reserves_the_start_cell() {
        let rules = AdversaryRules::default();

        assert_eq!(
            GameConfig::adversary((2, 2), 4, rules).validate(),
            Err(GameError::TooManyMines)
        );
        assert_eq!(GameConfig::adversary((2, 2), 3, rules).validate(), Ok(()));
        assert_eq!(GameConfig::classic((2, 2), 4).validate(), Ok(()));
        assert_eq!(
            GameConfig::classic((0, 2), 0).validate(),
            Err(GameError::InvalidBoardSize)
        );
    }

    #[test]
    fn degenerate_rules_only_matter_in_adversary_mode() {
        let rules = AdversaryRules {
            fire_odds: 0,
            ..Default::default()
        };

        assert_eq!(
            Difficulty::Secret.config_with_rules(rules).validate(),
            Err(GameError::InvalidRules("fire_odds"))
        );
        assert_eq!(Difficulty::Easy.config_with_rules(rules).validate(), Ok(()));
    }

    #[test]
    fn out_of_board_start_is_rejected() {
        let rules = AdversaryRules {
            player_start: Some((5, 0)),
            ..Default::default()
        };

        assert_eq!(
            GameConfig::adversary((5, 5), 1, rules).validate(),
            Err(GameError::InvalidCoords)
        );
    }
}
