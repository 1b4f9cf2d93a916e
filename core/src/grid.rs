use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    AlreadyRevealed,
    RevealedMine,
    RevealedSafe,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::AlreadyRevealed)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Row-major board of [`Cell`]s with the running mine and reveal counters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
    mines_deployed: CellCount,
    cells_revealed: CellCount,
}

impl Grid {
    /// Creates an empty board, without mines.
    pub fn new(size: Coord2) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidBoardSize);
        }

        Ok(Self {
            cells: Array2::default(size.to_nd_index()),
            mines_deployed: 0,
            cells_revealed: 0,
        })
    }

    /// Creates a board with mines at exactly the given positions; duplicates are placed once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut grid = Self::new(size)?;

        for &coords in mine_coords {
            let coords = grid.validate_coords(coords)?;
            grid.plant_mine(coords);
        }

        Ok(grid)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        // the constructor only accepts `Coord` sized dimensions
        (rows as Coord, cols as Coord)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn mines_deployed(&self) -> CellCount {
        self.mines_deployed
    }

    /// Safe cells revealed so far.
    pub fn cells_revealed(&self) -> CellCount {
        self.cells_revealed
    }

    /// Safe cells still hidden; the field is cleared when this reaches zero.
    pub fn remaining_hidden_safe_cells(&self) -> CellCount {
        self.total_cells()
            .saturating_sub(self.mines_deployed)
            .saturating_sub(self.cells_revealed)
    }

    /// Cells not yet revealed, mines included.
    pub fn hidden_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.cells_revealed)
    }

    pub fn flagged_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.flagged).count() as CellCount
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<&Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(&self.cells[coords.to_nd_index()])
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    /// Iterates every cell with its coordinates, row by row.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, &Cell)> {
        self.cells
            .indexed_iter()
            .map(|((row, col), cell)| ((row as Coord, col as Coord), cell))
    }

    /// Cells available to receive a mine, given an optional excluded cell.
    pub fn mine_capacity(&self, excluded: Option<Coord2>) -> CellCount {
        let occupied = self.mines_deployed
            + excluded
                .filter(|&coords| in_bounds(coords, self.size()) && !self[coords].mine)
                .map_or(0, |_| 1);
        self.total_cells().saturating_sub(occupied)
    }

    /// Places `count` mines on distinct random cells, never on `excluded`.
    ///
    /// The draw loop can only terminate when enough free cells exist, so the request is checked
    /// against the capacity before anything is placed.
    pub fn deploy_mines(
        &mut self,
        count: CellCount,
        excluded: Option<Coord2>,
        dice: &mut impl Dice,
    ) -> Result<()> {
        if let Some(excluded) = excluded {
            self.validate_coords(excluded)?;
        }

        let capacity = self.mine_capacity(excluded);
        if count > capacity {
            log::warn!(
                "Refusing to deploy {} mines, only {} cells are free",
                count,
                capacity
            );
            return Err(GameError::TooManyMines);
        }

        let (rows, cols) = self.size();
        let mut placed = 0;
        while placed < count {
            let coords = (
                dice.roll(rows.into()) as Coord,
                dice.roll(cols.into()) as Coord,
            );
            if Some(coords) == excluded || self[coords].mine {
                continue;
            }
            self.plant_mine(coords);
            placed += 1;
        }

        log::debug!("Deployed {} mines on a {}x{} board", count, rows, cols);
        Ok(())
    }

    fn plant_mine(&mut self, coords: Coord2) {
        if self[coords].mine {
            return;
        }

        self.cells[coords.to_nd_index()].mine = true;
        self.mines_deployed += 1;
        for pos in self.iter_neighbors(coords) {
            self.cells[pos.to_nd_index()].neighbor_mines += 1;
        }
    }

    /// Reveals a single cell without cascading; a flag on it is dropped.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        Ok(self.reveal_unchecked(coords))
    }

    pub(crate) fn reveal_unchecked(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.revealed {
            return RevealOutcome::AlreadyRevealed;
        }

        cell.revealed = true;
        cell.flagged = false;
        if cell.mine {
            RevealOutcome::RevealedMine
        } else {
            self.cells_revealed += 1;
            RevealOutcome::RevealedSafe
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;
        let cell = &mut self.cells[coords.to_nd_index()];

        if cell.revealed {
            Ok(MarkOutcome::NoChange)
        } else {
            cell.flagged = !cell.flagged;
            Ok(MarkOutcome::Changed)
        }
    }

    /// Reveals every mine, for the end-of-round disclosure.
    pub fn reveal_all_mines(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| cell.mine) {
            cell.revealed = true;
        }
    }

    /// Flags every mine, for the win disclosure.
    pub fn place_flags_on_all_mines(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| cell.mine) {
            cell.flagged = true;
        }
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }

    pub(crate) fn set_player(&mut self, coords: Coord2, present: bool) {
        self.cell_mut(coords).player = present;
    }

    pub(crate) fn add_monster(&mut self, coords: Coord2) {
        self.cell_mut(coords).monsters += 1;
    }

    pub(crate) fn remove_monster(&mut self, coords: Coord2) {
        let cell = self.cell_mut(coords);
        cell.monsters = cell.monsters.saturating_sub(1);
    }

    pub(crate) fn set_bullet(&mut self, coords: Coord2, present: bool) {
        self.cell_mut(coords).bullet = present;
    }

    pub(crate) fn set_trailing(&mut self, corridor: impl IntoIterator<Item = Coord2>, on: bool) {
        for coords in corridor {
            if in_bounds(coords, self.size()) {
                self.cell_mut(coords).trailing = on;
            }
        }
    }

    /// Spends the mine under a monster; the mine stays counted but is shown as used.
    pub(crate) fn consume_mine(&mut self, coords: Coord2) {
        let cell = self.cell_mut(coords);
        cell.mine_consumed = true;
        cell.revealed = true;
        cell.flagged = false;
    }

    pub(crate) fn mark_killed_by_mine(&mut self, coords: Coord2) {
        self.cell_mut(coords).killed_by_mine = true;
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::testing::Loaded;

    fn count_neighbor_mines(grid: &Grid, coords: Coord2) -> u8 {
        grid.iter_neighbors(coords)
            .filter(|&pos| grid[pos].is_mine())
            .count() as u8
    }

    #[test]
    fn fixed_mines_update_neighbor_counts() {
        let grid = Grid::from_mine_coords((3, 3), &[(0, 0), (2, 2)]).unwrap();

        assert_eq!(grid.mines_deployed(), 2);
        assert_eq!(grid[(1, 1)].neighbor_mine_count(), 2);
        assert_eq!(grid[(0, 1)].neighbor_mine_count(), 1);
        assert_eq!(grid[(2, 0)].neighbor_mine_count(), 0);
    }

    #[test]
    fn duplicate_fixed_mines_are_placed_once() {
        let grid = Grid::from_mine_coords((2, 2), &[(1, 1), (1, 1)]).unwrap();

        assert_eq!(grid.mines_deployed(), 1);
        assert_eq!(grid[(0, 0)].neighbor_mine_count(), 1);
    }

    #[test]
    fn out_of_range_mine_is_rejected() {
        assert_eq!(
            Grid::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn empty_board_is_rejected() {
        assert_eq!(Grid::new((0, 4)), Err(GameError::InvalidBoardSize));
    }

    #[test]
    fn deploy_skips_collisions_and_excluded_cell() {
        let mut grid = Grid::new((2, 2)).unwrap();
        // (0,0) twice, then the excluded (1,1), then (0,1)
        let mut dice = Loaded::new(&[0, 0, 0, 0, 1, 1, 0, 1]);

        grid.deploy_mines(1, Some((1, 1)), &mut dice).unwrap();
        grid.deploy_mines(1, Some((1, 1)), &mut dice).unwrap();

        assert!(grid[(0, 0)].is_mine());
        assert!(grid[(0, 1)].is_mine());
        assert!(!grid[(1, 1)].is_mine());
        assert_eq!(grid.mines_deployed(), 2);
    }

    #[test]
    fn deploy_counts_match_neighborhood() {
        let mut grid = Grid::new((6, 7)).unwrap();
        let mut dice = RandomDice::from_seed(11);

        grid.deploy_mines(12, None, &mut dice).unwrap();

        assert_eq!(grid.mines_deployed(), 12);
        for (coords, cell) in grid.iter_cells() {
            assert_eq!(cell.neighbor_mine_count(), count_neighbor_mines(&grid, coords));
        }
    }

    #[test]
    fn deploy_over_capacity_fails_before_placing() {
        let mut grid = Grid::new((2, 2)).unwrap();
        let mut dice = RandomDice::from_seed(1);

        assert_eq!(
            grid.deploy_mines(4, Some((0, 0)), &mut dice),
            Err(GameError::TooManyMines)
        );
        assert_eq!(grid.mines_deployed(), 0);

        grid.deploy_mines(3, Some((0, 0)), &mut dice).unwrap();
        assert!(!grid[(0, 0)].is_mine());
        assert_eq!(grid.remaining_hidden_safe_cells(), 1);
    }

    #[test]
    fn reveal_reports_each_outcome_once() {
        let mut grid = Grid::from_mine_coords((1, 2), &[(0, 0)]).unwrap();

        assert_eq!(grid.reveal((0, 1)), Ok(RevealOutcome::RevealedSafe));
        assert_eq!(grid.reveal((0, 1)), Ok(RevealOutcome::AlreadyRevealed));
        assert_eq!(grid.reveal((0, 0)), Ok(RevealOutcome::RevealedMine));
        assert_eq!(grid.reveal((0, 2)), Err(GameError::InvalidCoords));
        assert_eq!(grid.cells_revealed(), 1);
        assert_eq!(grid.remaining_hidden_safe_cells(), 0);
    }

    #[test]
    fn flags_toggle_only_on_hidden_cells() {
        let mut grid = Grid::from_mine_coords((1, 2), &[(0, 0)]).unwrap();

        assert_eq!(grid.toggle_flag((0, 0)), Ok(MarkOutcome::Changed));
        assert!(grid[(0, 0)].is_flagged());
        assert_eq!(grid.toggle_flag((0, 0)), Ok(MarkOutcome::Changed));
        assert!(!grid[(0, 0)].is_flagged());

        grid.reveal((0, 1)).unwrap();
        assert_eq!(grid.toggle_flag((0, 1)), Ok(MarkOutcome::NoChange));
        assert!(!grid[(0, 1)].is_flagged());
    }

    #[test]
    fn disclosure_touches_only_mines() {
        let mut grid = Grid::from_mine_coords((2, 2), &[(0, 1), (1, 0)]).unwrap();

        grid.reveal_all_mines();
        grid.place_flags_on_all_mines();

        assert!(grid[(0, 1)].is_revealed() && grid[(0, 1)].is_flagged());
        assert!(!grid[(0, 0)].is_revealed() && !grid[(0, 0)].is_flagged());
        assert_eq!(grid.cells_revealed(), 0);
        assert_eq!(grid.flagged_count(), 2);
    }
}
