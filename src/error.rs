use std::io;
use thiserror::Error;

/// Error type for detection operations.
#[derive(Error, Debug)]
pub enum DetectError {
    /// IO error while reading the byte source.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for detection operations.
pub type Result<T> = std::result::Result<T, DetectError>;
