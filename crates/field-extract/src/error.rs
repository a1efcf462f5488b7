//! Error types for field extraction.
//!
//! Every failure here is structural (bad input, bad configuration, missing
//! data); nothing is transient, so nothing is retried. The pipeline is
//! fail-fast: any of these aborts the run before an output file appears.

use thiserror::Error;

use plt_parser::PltError;

/// Errors that can occur during field extraction and dataset comparison.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Source or input dataset could not be read or parsed.
    #[error("failed to load dataset {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: PltError,
    },

    /// A variable required by a transform or export step is absent.
    #[error("variable not found in dataset: {0}")]
    MissingVariable(String),

    /// Non-positive spacing, inverted bounds, or non-finite region values.
    #[error("invalid grid spec: {0}")]
    InvalidGridSpec(String),

    /// The interpolation step could not resolve the target samples.
    #[error("interpolation failed: {0}")]
    Interpolation(String),

    /// Output could not be written.
    #[error("failed to write output {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Diff inputs have incompatible variable sets or sample counts.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Region configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ExtractError {
    /// Create a Load error.
    pub fn load(path: impl Into<String>, source: PltError) -> Self {
        Self::Load {
            path: path.into(),
            source,
        }
    }

    /// Create a MissingVariable error.
    pub fn missing_variable(name: impl Into<String>) -> Self {
        Self::MissingVariable(name.into())
    }

    /// Create an InvalidGridSpec error.
    pub fn invalid_grid_spec(msg: impl Into<String>) -> Self {
        Self::InvalidGridSpec(msg.into())
    }

    /// Create an Interpolation error.
    pub fn interpolation(msg: impl Into<String>) -> Self {
        Self::Interpolation(msg.into())
    }

    /// Create a Write error.
    pub fn write(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Create a SchemaMismatch error.
    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        Self::SchemaMismatch(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type for field extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
