//! Error types for hotspot analysis

use thiserror::Error;

/// Main error type for hotspot operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Insufficient regions: {strategy} needs at least {needed}, got {found}")]
    InsufficientRegions {
        strategy: String,
        needed: usize,
        found: usize,
    },

    #[error("Missing {what} for region {code}")]
    MissingData { what: &'static str, code: String },

    #[error("Duplicate region code: {0}")]
    DuplicateRegion(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Algorithm error: {0}")]
    Algorithm(String),
}

impl Error {
    /// Whether this error reports a violated analysis precondition
    /// (too few regions, bad parameters, missing inputs).
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::InsufficientRegions { .. }
                | Error::MissingData { .. }
                | Error::DuplicateRegion(_)
                | Error::InvalidParameter { .. }
        )
    }
}

/// Result type alias for hotspot operations
pub type Result<T> = std::result::Result<T, Error>;
