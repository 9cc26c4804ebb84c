//! Error types for rv-core

use thiserror::Error;

/// rv-core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid input (lengths, counts, levels)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Histograms that must share binning do not
    #[error("Binning mismatch: {left} bins vs {right} bins")]
    BinningMismatch {
        /// Bins of the first operand
        left: usize,
        /// Bins of the second operand
        right: usize,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
