//! Construction errors.
//!
//! Only construction can fail. A rejected move, rotation or merge is ordinary
//! control flow and is reported through return values instead.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid matrix dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("row {row} has {found} cells, expected {expected} like the first row")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("playfield must be {expected_width}x{expected_height}, got {width}x{height}")]
    GridSize {
        width: usize,
        height: usize,
        expected_width: usize,
        expected_height: usize,
    },

    #[error("gravity delay must be positive")]
    InvalidGravityDelay,
}

pub type Result<T> = std::result::Result<T, Error>;
