//! # Hotspot Cloud
//!
//! Acquisition of regional statistics from the SGIS OpenAPI (Statistics
//! Korea) for hotspot analysis.
//!
//! This crate fetches population statistics and administrative boundaries
//! per province, with a cached access token, retries and bounded
//! concurrent requests, and joins them into analysis regions.
//!
//! ## Features
//!
//! - `native` (default): Sync API via tokio `block_on`

pub mod auth;
pub mod cache;
pub mod error;
pub mod http;
pub mod models;
pub mod regions;
pub mod reproject;
pub mod sgis;

pub mod sync_api;

pub use auth::{AccessTokenProvider, SgisAuth, SgisCredentials, StaticToken};
pub use error::{CloudError, Result};
pub use models::PopulationItem;
pub use regions::{assemble_regions, Variable};
pub use sgis::{AreaQuery, Partition, SgisClient, SgisClientOptions, AVAILABLE_YEARS, SIDO_CODES};

/// Blocking API re-exported as `blocking` module (native only).
#[cfg(feature = "native")]
pub mod blocking {
    pub use crate::sync_api::*;
}
