use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Immutable mine placement for one game: the mine mask plus the per-cell
/// adjacent-mine counts, computed exactly once after placement and never
/// recomputed mid-game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineField {
    mines: Array2<bool>,
    counts: Array2<u8>,
    mine_count: CellCount,
}

impl MineField {
    pub fn from_mine_mask(mines: Array2<bool>) -> Self {
        let mine_count = mines.iter().filter(|&&m| m).count() as CellCount;
        let counts = compute_counts(&mines);
        Self {
            mines,
            counts,
            mine_count,
        }
    }

    /// Deterministic construction from explicit mine positions, mostly for
    /// tests and replays.
    pub fn from_mine_positions(size: Pos, positions: &[Pos]) -> Result<Self> {
        let mut mines: Array2<bool> = Array2::default(size.nd());
        for &(row, col) in positions {
            if row >= size.0 || col >= size.1 {
                return Err(GameError::OutOfBounds { row, col });
            }
            mines[(row, col).nd()] = true;
        }
        Ok(Self::from_mine_mask(mines))
    }

    pub fn size(&self) -> Pos {
        let (rows, cols) = self.mines.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        self.mines.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, pos: Pos) -> bool {
        self.mines[pos.nd()]
    }

    /// Cached count of mine-bearing cells in the clipped 8-neighborhood.
    /// Meaningful only for non-mine cells.
    pub fn adjacent_count(&self, pos: Pos) -> u8 {
        self.counts[pos.nd()]
    }

    pub fn check_bounds(&self, pos: Pos) -> Result<Pos> {
        let (rows, cols) = self.size();
        if pos.0 < rows && pos.1 < cols {
            Ok(pos)
        } else {
            Err(GameError::OutOfBounds {
                row: pos.0,
                col: pos.1,
            })
        }
    }

    pub fn mine_positions(&self) -> impl Iterator<Item = Pos> + '_ {
        self.mines
            .indexed_iter()
            .filter(|&(_, &mine)| mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    pub(crate) fn neighbors_of(&self, pos: Pos) -> Neighbors {
        self.mines.neighbors_of(pos)
    }
}

fn compute_counts(mines: &Array2<bool>) -> Array2<u8> {
    let mut counts: Array2<u8> = Array2::default(mines.dim());
    for ((row, col), &mine) in mines.indexed_iter() {
        if mine {
            continue;
        }
        let pos = (row as Coord, col as Coord);
        counts[pos.nd()] = mines
            .neighbors_of(pos)
            .filter(|&neighbor| mines[neighbor.nd()])
            .count() as u8;
    }
    counts
}
