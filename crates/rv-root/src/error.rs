//! Error type for ROOT file access.

use thiserror::Error;

/// Errors raised while reading a ROOT file.
#[derive(Debug, Error)]
pub enum RootError {
    /// Underlying I/O failure (open, mmap, write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not start with the `root` magic.
    #[error("not a ROOT file (bad magic)")]
    BadMagic,

    /// A read ran past the end of the buffer.
    #[error("buffer underflow at offset {offset}: need {need} bytes, have {have}")]
    BufferUnderflow {
        /// Read position.
        offset: usize,
        /// Bytes requested.
        need: usize,
        /// Bytes available.
        have: usize,
    },

    /// A compressed block could not be decoded.
    #[error("decompression failed: {0}")]
    Decompression(String),

    /// A streamed object did not match the expected layout.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// No key with this name in the directory.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// The key exists but holds a class this reader does not decode.
    #[error("unsupported class: {0}")]
    UnsupportedClass(String),
}

/// Result alias for ROOT operations.
pub type Result<T> = std::result::Result<T, RootError>;
