//! Error types for drill-core.

use thiserror::Error;

/// Result type alias using DrillError.
pub type Result<T> = std::result::Result<T, DrillError>;

/// Errors surfaced by the session engine.
///
/// Wrong answers and calls made while no session is active are not errors;
/// those come back as ordinary values or `None`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrillError {
    #[error("no playable entries for direction {direction}")]
    NoPlayableEntries { direction: String },

    #[error("invalid direction: {0}")]
    InvalidDirection(String),

    #[error("unknown language: {0}")]
    UnknownLanguage(String),
}
