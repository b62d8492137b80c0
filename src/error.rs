//! Error types for the crate.

use thiserror::Error;

/// Main error type of the crate.
///
/// Placing a mark on an occupied field is not an error: `Board::place` reports it
/// by returning `false`. This type covers everything that cannot be expressed that way.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("index {index} is out of range for a board with {cells} cells")]
    IndexOutOfRange { index: usize, cells: usize },

    #[error("coordinate ({row}, {col}) is outside of a {size}x{size} board")]
    CoordinateOutOfRange { row: usize, col: usize, size: usize },

    #[error("mark sequence has wrong length: expected {expected} cells, got {got}")]
    InvalidBoardLength { expected: usize, got: usize },

    #[error("invalid piece counts: first={first}, second={second} (must be equal or first ahead by 1)")]
    InvalidPieceCounts { first: usize, second: usize },

    #[error("cannot play {moves} moves on a board with {cells} cells")]
    TooManyMoves { moves: usize, cells: usize },

    #[error("no unfinished board found after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    #[error("illegal move at ({row}, {col})")]
    IllegalMove { row: usize, col: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
