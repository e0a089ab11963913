use ndarray::Array2;

/// Single grid axis used for row and column indices.
pub type Coord = u16;

/// Count type for mine and cell totals.
pub type CellCount = u32;

/// Grid position as `(row, col)`, 0-indexed from the top-left corner.
pub type Pos = (Coord, Coord);

pub const fn cell_total(rows: Coord, cols: Coord) -> CellCount {
    rows as CellCount * cols as CellCount
}

/// Conversion into the index form `ndarray` expects.
pub trait AsNdIndex {
    fn nd(self) -> [usize; 2];
}

impl AsNdIndex for Pos {
    fn nd(self) -> [usize; 2] {
        [self.0.into(), self.1.into()]
    }
}

// Row-major, then column-major within each row. The flood fill does not
// depend on this order, but tests do.
const OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Iterator over the up-to-8 in-bounds neighbors of a grid position.
/// Corner cells yield 3 neighbors, edge cells 5, interior cells 8.
#[derive(Debug)]
pub struct Neighbors {
    row: i32,
    col: i32,
    rows: i32,
    cols: i32,
    offset: usize,
}

impl Iterator for Neighbors {
    type Item = Pos;

    fn next(&mut self) -> Option<Self::Item> {
        while self.offset < OFFSETS.len() {
            let (dr, dc) = OFFSETS[self.offset];
            self.offset += 1;

            let row = self.row + dr;
            let col = self.col + dc;
            if row >= 0 && row < self.rows && col >= 0 && col < self.cols {
                return Some((row as Coord, col as Coord));
            }
        }
        None
    }
}

/// Neighbors of `pos` on a `size` grid, clipped at the boundary.
pub fn neighbors(pos: Pos, size: Pos) -> Neighbors {
    Neighbors {
        row: pos.0.into(),
        col: pos.1.into(),
        rows: size.0.into(),
        cols: size.1.into(),
        offset: 0,
    }
}

pub trait GridNeighbors {
    fn neighbors_of(&self, pos: Pos) -> Neighbors;
}

impl<T> GridNeighbors for Array2<T> {
    fn neighbors_of(&self, pos: Pos) -> Neighbors {
        let (rows, cols) = self.dim();
        neighbors(pos, (rows as Coord, cols as Coord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(pos: Pos, size: Pos) -> Vec<Pos> {
        neighbors(pos, size).collect()
    }

    #[test]
    fn corner_has_three_neighbors() {
        assert_eq!(collect((0, 0), (3, 3)), vec![(0, 1), (1, 0), (1, 1)]);
        assert_eq!(collect((2, 2), (3, 3)), vec![(1, 1), (1, 2), (2, 1)]);
    }

    #[test]
    fn edge_has_five_neighbors() {
        assert_eq!(collect((0, 1), (3, 3)).len(), 5);
        assert_eq!(collect((1, 0), (3, 3)).len(), 5);
    }

    #[test]
    fn interior_has_eight_neighbors() {
        assert_eq!(
            collect((1, 1), (3, 3)),
            vec![
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 0),
                (1, 2),
                (2, 0),
                (2, 1),
                (2, 2)
            ]
        );
    }

    #[test]
    fn single_cell_grid_has_no_neighbors() {
        assert!(collect((0, 0), (1, 1)).is_empty());
    }
}
