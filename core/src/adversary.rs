use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdversaryState {
    /// Walking toward the player, possibly about to shoot.
    Seeking,
    /// Standing still while its projectile travels.
    ProjectileInFlight,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projectile {
    position: Coord2,
    previous: Option<Coord2>,
    direction: Direction,
}

impl Projectile {
    fn launch(position: Coord2, direction: Direction) -> Self {
        Self {
            position,
            previous: None,
            direction,
        }
    }

    pub fn position(&self) -> Coord2 {
        self.position
    }

    /// Where the projectile was before its last jump; `None` right after launch.
    pub fn previous(&self) -> Option<Coord2> {
        self.previous
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Every cell of the last jump, from the previous position to the current one inclusive.
    pub fn path(&self) -> impl Iterator<Item = Coord2> + use<> {
        let position = self.position;
        self.previous
            .into_iter()
            .flat_map(move |previous| segment(previous, position))
    }

    /// Cells swept over by the last jump, excluding the one the projectile landed on.
    pub fn corridor(&self) -> impl Iterator<Item = Coord2> + use<> {
        let position = self.position;
        self.path().filter(move |&coords| coords != position)
    }

    /// Whether the last jump passed through `target`.
    pub fn hits(&self, target: Coord2) -> bool {
        self.path().any(|coords| coords == target)
    }
}

/// What an adversary did during one tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickAction {
    Stayed,
    Stepped { from: Coord2, to: Coord2 },
    Fired(Direction),
    ProjectileAdvanced { from: Coord2, to: Coord2 },
    /// The jump left the board; `from..=to` is the part of it still on the board.
    ProjectileExpired { from: Coord2, to: Coord2 },
}

impl TickAction {
    /// Whether a projectile that flew off the board passed through `target` on its way out.
    pub fn swept_off_board(&self, target: Coord2) -> bool {
        match *self {
            Self::ProjectileExpired { from, to } => segment(from, to).any(|coords| coords == target),
            _ => false,
        }
    }
}

/// One roaming enemy of the adversary mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adversary {
    alive: bool,
    position: Coord2,
    projectile: Option<Projectile>,
}

impl Adversary {
    pub fn new(position: Coord2) -> Self {
        Self {
            alive: true,
            position,
            projectile: None,
        }
    }

    /// Board corner inside the quadrant diagonally opposite the one holding `player`.
    pub fn spawn_corner(player: Coord2, size: Coord2) -> Coord2 {
        let (rows, cols) = size;
        let far_row = rows.saturating_sub(1);
        let far_col = cols.saturating_sub(1);
        let top = player.0 < rows / 2;
        let left = player.1 < cols / 2;

        match (top, left) {
            (true, true) => (far_row, far_col),
            (true, false) => (far_row, 0),
            (false, true) => (0, far_col),
            (false, false) => (0, 0),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn position(&self) -> Coord2 {
        self.position
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        self.projectile.as_ref()
    }

    pub fn state(&self) -> AdversaryState {
        if self.projectile.is_some() {
            AdversaryState::ProjectileInFlight
        } else {
            AdversaryState::Seeking
        }
    }

    pub(crate) fn kill(&mut self) {
        self.alive = false;
        self.projectile = None;
    }

    /// Runs one tick of the chase/shoot state machine against the player's position.
    pub fn take_turn(
        &mut self,
        player: Coord2,
        bounds: Coord2,
        rules: &AdversaryRules,
        dice: &mut impl Dice,
    ) -> TickAction {
        if !self.alive {
            return TickAction::Stayed;
        }

        match self.projectile {
            Some(projectile) => self.advance_projectile(projectile, player, bounds, rules),
            None => self.seek(player, rules, dice),
        }
    }

    fn seek(&mut self, player: Coord2, rules: &AdversaryRules, dice: &mut impl Dice) -> TickAction {
        let (row, col) = self.position;
        let row_gap = row.abs_diff(player.0);
        let col_gap = col.abs_diff(player.1);

        if manhattan(self.position, player) >= rules.fire_range && dice.roll(rules.fire_odds) == 0 {
            let direction = if row_gap > col_gap {
                if row > player.0 {
                    Direction::Up
                } else {
                    Direction::Down
                }
            } else if col > player.1 {
                Direction::Left
            } else {
                Direction::Right
            };
            self.projectile = Some(Projectile::launch(self.position, direction));
            return TickAction::Fired(direction);
        }

        let move_row = match (row_gap, col_gap) {
            (0, 0) => return TickAction::Stayed,
            (_, 0) => true,
            (0, _) => false,
            _ => dice.roll(2) == 0,
        };

        let from = self.position;
        self.position = if move_row {
            if row < player.0 {
                (row + 1, col)
            } else {
                (row - 1, col)
            }
        } else if col < player.1 {
            (row, col + 1)
        } else {
            (row, col - 1)
        };

        TickAction::Stepped {
            from,
            to: self.position,
        }
    }

    fn advance_projectile(
        &mut self,
        mut projectile: Projectile,
        player: Coord2,
        bounds: Coord2,
        rules: &AdversaryRules,
    ) -> TickAction {
        let (row, col) = projectile.position;
        let row_gap = row.abs_diff(player.0);
        let col_gap = col.abs_diff(player.1);

        if projectile.direction.is_vertical() {
            if row_gap <= rules.reaim_alignment && col_gap > rules.reaim_offset {
                projectile.direction = if player.1 < col {
                    Direction::Left
                } else {
                    Direction::Right
                };
            }
        } else if col_gap <= rules.reaim_alignment && row_gap > rules.reaim_offset {
            projectile.direction = if player.0 < row {
                Direction::Up
            } else {
                Direction::Down
            };
        }

        let from = projectile.position;
        match projectile
            .direction
            .offset(from, rules.projectile_speed, bounds)
        {
            Some(to) => {
                projectile.previous = Some(from);
                projectile.position = to;
                self.projectile = Some(projectile);
                TickAction::ProjectileAdvanced { from, to }
            }
            None => {
                self.projectile = None;
                let to = (1..rules.projectile_speed)
                    .rev()
                    .find_map(|distance| projectile.direction.offset(from, distance, bounds))
                    .unwrap_or(from);
                TickAction::ProjectileExpired { from, to }
            }
        }
    }
}
