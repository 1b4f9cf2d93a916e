use crate::*;

impl Grid {
    /// Opens the 4-connected region of clear cells around `seed`, along with the numbered cells
    /// bordering it.
    ///
    /// The seed itself must already be revealed by the caller and is not part of the result.
    /// Traversal stops at revealed cells, so repeating the call from the same seed yields nothing.
    pub fn propagate_reveal(&mut self, seed: Coord2) -> Vec<Coord2> {
        let mut opened = Vec::new();
        if !in_bounds(seed, self.size()) || !self[seed].is_clear() {
            return opened;
        }

        let mut to_visit = self.orthogonal_neighbors(seed);
        while let Some(coords) = to_visit.pop() {
            if self.reveal_unchecked(coords) != RevealOutcome::RevealedSafe {
                continue;
            }
            opened.push(coords);

            if self[coords].is_clear() {
                to_visit.extend(
                    self.orthogonal_neighbors(coords)
                        .into_iter()
                        .filter(|&pos| !self[pos].is_revealed()),
                );
            }
        }

        opened
    }

    fn orthogonal_neighbors(&self, coords: Coord2) -> Vec<Coord2> {
        let size = self.size();
        Direction::ALL
            .iter()
            .filter_map(|direction| direction.offset(coords, 1, size))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn opened_set(grid: &mut Grid, seed: Coord2) -> BTreeSet<Coord2> {
        assert_eq!(grid.reveal(seed), Ok(RevealOutcome::RevealedSafe));
        grid.propagate_reveal(seed).into_iter().collect()
    }

    #[test]
    fn five_by_five_region_matches_hand_fill() {
        // . . . 1 *
        // . . . 2 2
        // 1 1 . 1 *
        // * 1 . 1 1
        // 1 1 . . .
        let mut grid = Grid::from_mine_coords((5, 5), &[(0, 4), (2, 4), (3, 0)]).unwrap();

        let opened = opened_set(&mut grid, (0, 0));

        let expected: BTreeSet<Coord2> = [
            (0, 1),
            (0, 2),
            (0, 3),
            (1, 0),
            (1, 1),
            (1, 2),
            (1, 3),
            (2, 0),
            (2, 1),
            (2, 2),
            (2, 3),
            (3, 1),
            (3, 2),
            (3, 3),
            (3, 4),
            (4, 2),
            (4, 1),
            (4, 3),
            (4, 4),
        ]
        .into_iter()
        .collect();
        assert_eq!(opened, expected);
        assert!(!grid[(4, 0)].is_revealed());
        assert!(!grid[(1, 4)].is_revealed());
        assert_eq!(grid.cells_revealed(), 20);
        assert_eq!(grid.remaining_hidden_safe_cells(), 2);
    }

    #[test]
    fn second_propagation_does_nothing() {
        let mut grid = Grid::from_mine_coords((4, 4), &[(3, 3)]).unwrap();

        let first = opened_set(&mut grid, (0, 0));
        let revealed = grid.cells_revealed();

        assert!(!first.is_empty());
        assert!(grid.propagate_reveal((0, 0)).is_empty());
        assert_eq!(grid.cells_revealed(), revealed);
    }

    #[test]
    fn numbered_seed_does_not_spread() {
        let mut grid = Grid::from_mine_coords((3, 3), &[(0, 0)]).unwrap();

        let opened = opened_set(&mut grid, (1, 1));

        assert!(opened.is_empty());
        assert_eq!(grid.cells_revealed(), 1);
    }

    #[test]
    fn cascade_clears_misplaced_flags() {
        let mut grid = Grid::from_mine_coords((1, 4), &[(0, 3)]).unwrap();
        grid.toggle_flag((0, 1)).unwrap();

        let opened = opened_set(&mut grid, (0, 0));

        assert_eq!(opened, [(0, 1), (0, 2)].into_iter().collect());
        assert!(!grid[(0, 1)].is_flagged());
        assert_eq!(grid.remaining_hidden_safe_cells(), 0);
    }

    #[test]
    fn open_corner_reveals_all_but_the_mine() {
        let mut grid = Grid::from_mine_coords((3, 3), &[(2, 2)]).unwrap();

        let opened = opened_set(&mut grid, (0, 0));

        assert_eq!(opened.len(), 7);
        assert!(!grid[(2, 2)].is_revealed());
    }
}
