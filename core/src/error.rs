use crate::{CellCount, Coord};
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid board configuration: {rows}x{cols} with {mines} mines")]
    InvalidConfig {
        rows: Coord,
        cols: Coord,
        mines: CellCount,
    },
    #[error("position ({row}, {col}) is outside the board")]
    OutOfBounds { row: Coord, col: Coord },
    #[error("game already ended, no new moves are accepted")]
    GameOver,
}

pub type Result<T> = core::result::Result<T, GameError>;
