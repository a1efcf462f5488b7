//! Error types for dataset parsing and manipulation.

use thiserror::Error;

/// Result type for dataset operations.
pub type PltResult<T> = Result<T, PltError>;

/// Error types for dataset parsing and manipulation.
#[derive(Error, Debug)]
pub enum PltError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing required variable, zone, or header
    #[error("missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("invalid data format: {0}")]
    InvalidFormat(String),

    /// Interpolation error
    #[error("interpolation error: {0}")]
    Interpolation(String),
}

impl PltError {
    /// Create a MissingData error.
    pub fn missing_data(msg: impl Into<String>) -> Self {
        Self::MissingData(msg.into())
    }

    /// Create an InvalidFormat error.
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    /// Create an Interpolation error.
    pub fn interpolation(msg: impl Into<String>) -> Self {
        Self::Interpolation(msg.into())
    }
}
