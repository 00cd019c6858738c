//! Fixed token for tests and pre-issued tokens.

use crate::auth::AccessTokenProvider;
use crate::error::Result;
use crate::http::HttpClient;
use futures::future::{self, BoxFuture, FutureExt};

/// A token obtained elsewhere, used as is.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl AccessTokenProvider for StaticToken {
    fn access_token<'a>(&'a self, _http: &'a HttpClient) -> BoxFuture<'a, Result<String>> {
        future::ready(Ok(self.0.clone())).boxed()
    }
}
