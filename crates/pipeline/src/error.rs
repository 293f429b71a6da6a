//! Error types for the pipeline crate.
//!
//! Decisions never fail: missing data folds into a permissive outcome.
//! These errors only come from building filters and loading configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    /// A wildcard pattern could not be turned into a regular expression
    #[error("Invalid wildcard pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Retention window rejected at configuration time
    #[error("Invalid value. Days must be greater than 0 (got {keep_for_days})")]
    InvalidRetention { keep_for_days: i32 },

    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration file was not valid JSON
    #[error("Malformed configuration: {0}")]
    ConfigError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FilterError>;
