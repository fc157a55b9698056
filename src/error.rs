//! Error types for ftp-courier
//!
//! Boundary-level failures (configuration, connect, list, close) are values of
//! [`Error`] and abort the run that hit them. Per-file transfer and move
//! failures never surface here: they are captured as outcomes in the batch
//! reports (see [`crate::types::FileOutcome`]) and the run keeps going.

use thiserror::Error;

/// Result type alias for ftp-courier operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ftp-courier
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The settings key that caused the error (e.g., "Host")
        key: Option<String>,
    },

    /// Failed to establish or authenticate the remote session
    #[error("connection error: {0}")]
    Connect(String),

    /// Failed to retrieve the remote file listing
    #[error("failed to list remote files: {0}")]
    RemoteList(String),

    /// Failed to close the remote session cleanly
    #[error("failed to close remote session: {0}")]
    RemoteClose(String),

    /// Remote retrieval error for a single file
    ///
    /// Only ever observed inside a batch report; the fetch loop catches it
    /// per file and continues.
    #[error("remote transfer error: {0}")]
    Remote(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Convenience constructor for configuration errors
    pub fn config(message: impl Into<String>, key: Option<&str>) -> Self {
        Self::Config {
            message: message.into(),
            key: key.map(str::to_owned),
        }
    }
}
