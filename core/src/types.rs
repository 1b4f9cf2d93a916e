use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Sum of the row and column distances between two cells.
pub const fn manhattan(a: Coord2, b: Coord2) -> CellCount {
    (a.0.abs_diff(b.0) as CellCount) + (a.1.abs_diff(b.1) as CellCount)
}

pub const fn in_bounds(coords: Coord2, bounds: Coord2) -> bool {
    coords.0 < bounds.0 && coords.1 < bounds.1
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub const fn delta(self) -> (i8, i8) {
        use Direction::*;
        match self {
            Up => (-1, 0),
            Down => (1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }

    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Moves `coords` by `distance` cells, returning a value only when it remains in bounds.
    pub fn offset(self, coords: Coord2, distance: Coord, bounds: Coord2) -> Option<Coord2> {
        let (dr, dc) = self.delta();
        let (row, col) = coords;
        let distance = i16::from(distance);
        let next_row = i16::from(row) + i16::from(dr) * distance;
        let next_col = i16::from(col) + i16::from(dc) * distance;
        let next = (
            Coord::try_from(next_row).ok()?,
            Coord::try_from(next_col).ok()?,
        );
        in_bounds(next, bounds).then_some(next)
    }
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (dr, dc) = delta;
    let (max_row, max_col) = bounds;

    let next_row = row.checked_add_signed(dr)?;
    if next_row >= max_row {
        return None;
    }

    let next_col = col.checked_add_signed(dc)?;
    if next_col >= max_col {
        return None;
    }

    Some((next_row, next_col))
}

/// Iterates the in-bounds cells of the 8-neighborhood around a center cell.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub(crate) fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

/// Iterates the cells of a straight row or column segment from `from` to `to`, both inclusive.
///
/// Segments that are not axis aligned yield only `from`.
pub fn segment(from: Coord2, to: Coord2) -> impl Iterator<Item = Coord2> {
    let (row_step, col_step, len) = if from.0 == to.0 {
        (0i16, signum(from.1, to.1), from.1.abs_diff(to.1))
    } else if from.1 == to.1 {
        (signum(from.0, to.0), 0i16, from.0.abs_diff(to.0))
    } else {
        (0, 0, 0)
    };

    (0..=i16::from(len)).map(move |i| {
        (
            (i16::from(from.0) + row_step * i) as Coord,
            (i16::from(from.1) + col_step * i) as Coord,
        )
    })
}

fn signum(from: Coord, to: Coord) -> i16 {
    (i16::from(to) - i16::from(from)).signum()
}
