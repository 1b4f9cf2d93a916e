use serde::{Deserialize, Serialize};

use crate::*;

/// Tunables of the adversary mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdversaryRules {
    /// Adversaries spawned over a whole round; defeating all of them wins.
    pub roster_cap: u16,
    /// A new adversary arrives every this many turns.
    pub spawn_interval: u32,
    pub boost_cap: u8,
    /// One boost point comes back every this many turns.
    pub boost_regen_interval: u32,
    pub boost_step_cost: u8,
    pub teleport_cost: u8,
    /// Minimum Manhattan distance from which an adversary may shoot.
    pub fire_range: CellCount,
    /// A shot is fired on one roll in this many.
    pub fire_odds: u32,
    pub projectile_speed: Coord,
    pub reaim_alignment: Coord,
    pub reaim_offset: Coord,
    /// Where the player starts; defaults to just above the board center.
    pub player_start: Option<Coord2>,
}

impl Default for AdversaryRules {
    fn default() -> Self {
        Self {
            roster_cap: 101,
            spawn_interval: 8,
            boost_cap: 8,
            boost_regen_interval: 2,
            boost_step_cost: 2,
            teleport_cost: 4,
            fire_range: 16,
            fire_odds: 6,
            projectile_speed: 3,
            reaim_alignment: 1,
            reaim_offset: 3,
            player_start: None,
        }
    }
}

impl AdversaryRules {
    /// Intervals, odds and speed must be non-zero.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("spawn_interval", self.spawn_interval),
            ("boost_regen_interval", self.boost_regen_interval),
            ("fire_odds", self.fire_odds),
            ("projectile_speed", u32::from(self.projectile_speed)),
        ];
        match positive.into_iter().find(|&(_, value)| value == 0) {
            Some((name, _)) => {
                log::warn!("Rejecting adversary rules: {} is zero", name);
                Err(GameError::InvalidRules(name))
            }
            None => Ok(()),
        }
    }

    pub fn player_start(&self, size: Coord2) -> Coord2 {
        self.player_start
            .unwrap_or(((size.0 / 2).saturating_sub(1), size.1 / 2))
    }
}
