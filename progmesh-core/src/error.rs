//! Error types for progmesh

use thiserror::Error;

/// Main error type for progmesh operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for progmesh operations
pub type Result<T> = std::result::Result<T, Error>;
