//! Headless minesweeper board engine: grid construction, mine placement,
//! flood-fill reveal, win/loss detection, pause snapshots, and a small
//! persisted leaderboard. Rendering and input handling live elsewhere.

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use minefield::*;
pub use scores::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod generator;
mod minefield;
mod scores;
mod session;
mod types;

/// Board dimensions and mine count, as read from configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    /// Builds a validated configuration. A zero-sized board or a mine count
    /// that does not leave at least one safe cell is a fatal configuration
    /// error: placement by resampling would never terminate on a full board.
    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        let config = Self { rows, cols, mines };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 || self.mines >= self.total_cells() {
            return Err(GameError::InvalidConfig {
                rows: self.rows,
                cols: self.cols,
                mines: self.mines,
            });
        }
        Ok(())
    }

    pub const fn size(&self) -> Pos {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        cell_total(self.rows, self.cols)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }
}
