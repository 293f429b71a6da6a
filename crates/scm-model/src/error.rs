//! Error types for the scm-model crate.
//!
//! Only snapshot loading can fail. The model types themselves are plain
//! data and never produce errors.

use thiserror::Error;

/// Errors that can occur while loading a source snapshot
#[derive(Error, Debug)]
pub enum ScmModelError {
    /// Snapshot file could not be found
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading the snapshot
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Snapshot was not valid JSON or did not match the expected shape
    #[error("Malformed snapshot: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Snapshot parsed but is inconsistent
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ScmModelError>;
