use crate::types::{ParseDirectionError, Tile};

/// Errors raised by the board engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    InvalidDirection(#[from] ParseDirectionError),

    #[error("board has no rows")]
    EmptyBoard,

    #[error("board is not square: row {row} has {len} cells, expected {size}")]
    NotSquare { row: usize, len: usize, size: usize },

    #[error("invalid tile {value} at ({row}, {col}): tiles must be 0 or a power of two >= 2")]
    InvalidTile { row: usize, col: usize, value: Tile },

    #[error("board size {size} out of range ({min}..={max})")]
    InvalidSize { size: usize, min: usize, max: usize },
}
