//! Error types for SGIS data acquisition.

use thiserror::Error;

/// Errors produced while fetching region data.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SGIS API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("core error: {0}")]
    Core(#[from] hotspot_core::Error),
}

/// Result alias for acquisition operations.
pub type Result<T> = std::result::Result<T, CloudError>;
