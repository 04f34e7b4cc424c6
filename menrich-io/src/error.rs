use std::io;
use thiserror::Error;

/// Error type for menrich-io operations.
#[derive(Error, Debug)]
pub enum MenrichIoError {
    /// IO error occurred during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Results could not be serialized.
    #[error("Failed to serialize results: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for menrich-io operations.
pub type Result<T> = std::result::Result<T, MenrichIoError>;
