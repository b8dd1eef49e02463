//! Error types for kalends.
//!
//! Decoding ICS text never produces an error; these cover configuration,
//! stream I/O and the JSON event interchange.

use thiserror::Error;

/// Errors that can occur in kalends operations.
#[derive(Error, Debug)]
pub enum KalendsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for KalendsError {
    fn from(err: serde_json::Error) -> Self {
        KalendsError::Serialization(err.to_string())
    }
}

/// Result type alias for kalends operations.
pub type KalendsResult<T> = Result<T, KalendsError>;
