//! Access tokens for the SGIS OpenAPI.

mod sgis;
mod fixed;

pub use fixed::StaticToken;
pub use sgis::{SgisAuth, SgisCredentials};

use crate::error::Result;
use crate::http::HttpClient;
use futures::future::BoxFuture;

/// Source of a currently valid access token.
///
/// Implementations may fetch and cache tokens; callers only ever ask for
/// the token to put on the next request.
pub trait AccessTokenProvider: Send + Sync {
    /// Return a token that is valid now.
    fn access_token<'a>(&'a self, http: &'a HttpClient) -> BoxFuture<'a, Result<String>>;
}
