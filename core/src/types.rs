use core::fmt;

/// Single coordinate axis used for field width, height, and positions.
pub type Coord = u16;

/// Count type used for mine counts, quotas and total-cell counts.
pub type CellCount = u32;

/// Zero-based position on a field, `x` is the column and `y` the row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    pub x: Coord,
    pub y: Coord,
}

impl Coordinate {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }
}

impl From<(Coord, Coord)> for Coordinate {
    fn from((x, y): (Coord, Coord)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Grid storage is `(rows, columns)`, so a coordinate maps to `[y, x]`.
pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coordinate {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.y.into(), self.x.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

const DISPLACEMENTS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `coord`, returning a value only when it remains inside `width` x `height`.
fn apply_delta(coord: Coordinate, delta: (i32, i32), width: Coord, height: Coord) -> Option<Coordinate> {
    let (dx, dy) = delta;

    let next_x = coord.x.checked_add_signed(dx.try_into().ok()?)?;
    if next_x >= width {
        return None;
    }

    let next_y = coord.y.checked_add_signed(dy.try_into().ok()?)?;
    if next_y >= height {
        return None;
    }

    Some(Coordinate::new(next_x, next_y))
}

/// Iterates the up-to-8 in-bounds cells sharing an edge or a corner with `center`.
#[derive(Debug, Clone)]
pub struct NeighborIter {
    center: Coordinate,
    width: Coord,
    height: Coord,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coordinate, width: Coord, height: Coord) -> Self {
        Self {
            center,
            width,
            height,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item = apply_delta(
                self.center,
                DISPLACEMENTS[usize::from(self.index)],
                self.width,
                self.height,
            );
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbors(x: Coord, y: Coord, width: Coord, height: Coord) -> Vec<Coordinate> {
        NeighborIter::new(Coordinate::new(x, y), width, height).collect()
    }

    #[test]
    fn interior_cell_has_eight_neighbors() {
        assert_eq!(neighbors(1, 1, 3, 3).len(), 8);
    }

    #[test]
    fn corner_cells_exclude_out_of_bounds() {
        let top_left = neighbors(0, 0, 3, 3);
        assert_eq!(
            top_left,
            vec![Coordinate::new(1, 0), Coordinate::new(0, 1), Coordinate::new(1, 1)]
        );

        let bottom_right = neighbors(2, 2, 3, 3);
        assert_eq!(
            bottom_right,
            vec![Coordinate::new(1, 1), Coordinate::new(2, 1), Coordinate::new(1, 2)]
        );
    }

    #[test]
    fn edge_cell_includes_diagonals_on_both_sides() {
        let top_middle = neighbors(1, 0, 3, 2);
        assert_eq!(top_middle.len(), 5);
        assert!(top_middle.contains(&Coordinate::new(0, 1)));
        assert!(top_middle.contains(&Coordinate::new(2, 1)));
    }

    #[test]
    fn single_cell_field_has_no_neighbors() {
        assert!(neighbors(0, 0, 1, 1).is_empty());
    }

    #[test]
    fn nd_index_is_row_major() {
        assert_eq!(Coordinate::new(3, 1).to_nd_index(), [1, 3]);
    }
}
