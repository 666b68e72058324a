//! Error types for the tldat crate.

use thiserror::Error;

/// Errors that can occur when working with TLDAT archives.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] tldat_common::Error),

    /// Malformed binary structure (truncated header, bad prologue).
    #[error("malformed archive: {0}")]
    Format(String),

    /// Payload decompression failure.
    #[error("decompression error: {0}")]
    Decode(String),
}

/// Result type for TLDAT operations.
pub type Result<T> = std::result::Result<T, Error>;
