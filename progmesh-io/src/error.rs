//! Error types for I/O operations

use thiserror::Error;

/// Errors that can occur during I/O operations
#[derive(Error, Debug)]
pub enum IoError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file format: {format}")]
    InvalidFormat { format: String },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        IoError::Parse {
            line,
            message: message.into(),
        }
    }
}

impl From<IoError> for progmesh_core::Error {
    fn from(e: IoError) -> Self {
        match e {
            IoError::Io(e) => progmesh_core::Error::Io(e),
            IoError::FileNotFound { path } => progmesh_core::Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path),
            )),
            IoError::InvalidFormat { format } => progmesh_core::Error::UnsupportedFormat(format),
            other => progmesh_core::Error::InvalidData(other.to_string()),
        }
    }
}
