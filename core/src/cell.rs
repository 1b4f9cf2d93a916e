use serde::{Deserialize, Serialize};

/// State of one board position, shared by the classic and adversary modes.
///
/// Mutation goes through [`Grid`](crate::Grid); the view layer only reads it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) mine: bool,
    pub(crate) revealed: bool,
    pub(crate) flagged: bool,
    pub(crate) neighbor_mines: u8,
    pub(crate) player: bool,
    pub(crate) monsters: u16,
    pub(crate) bullet: bool,
    pub(crate) trailing: bool,
    pub(crate) mine_consumed: bool,
    pub(crate) killed_by_mine: bool,
}

impl Cell {
    pub const fn is_mine(&self) -> bool {
        self.mine
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Mines among the up to 8 surrounding cells.
    pub const fn neighbor_mine_count(&self) -> u8 {
        self.neighbor_mines
    }

    /// Whether revealing this cell starts a flood fill.
    pub const fn is_clear(&self) -> bool {
        !self.mine && self.neighbor_mines == 0
    }

    pub const fn has_player(&self) -> bool {
        self.player
    }

    /// Monsters standing here; more than one only while a turn resolves.
    pub const fn monster_count(&self) -> u16 {
        self.monsters
    }

    pub const fn has_bullet(&self) -> bool {
        self.bullet
    }

    /// Part of the corridor a projectile swept through on its last jump.
    pub const fn is_trailing(&self) -> bool {
        self.trailing
    }

    /// Mine already spent killing a monster.
    pub const fn is_mine_consumed(&self) -> bool {
        self.mine_consumed
    }

    pub const fn killed_player(&self) -> bool {
        self.killed_by_mine
    }

    /// A mine the player can still use against a monster.
    pub const fn is_armed_mine(&self) -> bool {
        self.mine && !self.mine_consumed
    }
}
