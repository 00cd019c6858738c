//! SGIS consumer-key authentication with a cached access token.

use std::fmt;
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::Mutex;
use tracing::info;

use crate::auth::AccessTokenProvider;
use crate::cache::TokenCache;
use crate::error::{CloudError, Result};
use crate::http::HttpClient;
use crate::models::{ApiEnvelope, AuthResult};

/// Service credentials issued by SGIS.
#[derive(Clone)]
pub struct SgisCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
}

impl SgisCredentials {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    /// Load credentials from the environment.
    ///
    /// Reads `SGIS_CONSUMER_KEY` and `SGIS_CONSUMER_SECRET`.
    pub fn from_env() -> Result<Self> {
        let key = std::env::var("SGIS_CONSUMER_KEY")
            .map_err(|_| CloudError::Auth("SGIS_CONSUMER_KEY not set".into()))?;
        let secret = std::env::var("SGIS_CONSUMER_SECRET")
            .map_err(|_| CloudError::Auth("SGIS_CONSUMER_SECRET not set".into()))?;
        Ok(Self::new(key, secret))
    }
}

impl fmt::Debug for SgisCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SgisCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"***")
            .finish()
    }
}

/// Token provider backed by `auth/authentication.json`.
pub struct SgisAuth {
    credentials: SgisCredentials,
    auth_url: String,
    cache: Mutex<TokenCache>,
}

impl SgisAuth {
    /// Create a provider for the API rooted at `base_url`.
    pub fn new(credentials: SgisCredentials, base_url: &str, token_lifetime: Duration) -> Self {
        Self {
            credentials,
            auth_url: format!("{}/auth/authentication.json", base_url.trim_end_matches('/')),
            cache: Mutex::new(TokenCache::new(token_lifetime)),
        }
    }

    async fn fetch_token(&self, http: &HttpClient) -> Result<String> {
        let query = [
            ("consumer_key", self.credentials.consumer_key.as_str()),
            ("consumer_secret", self.credentials.consumer_secret.as_str()),
        ];
        let envelope: ApiEnvelope<AuthResult> = http.get_json(&self.auth_url, &query).await?;
        let result = envelope.into_result().map_err(|e| match e {
            CloudError::Api { code, message } => {
                CloudError::Auth(format!("SGIS rejected credentials ({}): {}", code, message))
            }
            other => other,
        })?;
        Ok(result.access_token)
    }
}

impl AccessTokenProvider for SgisAuth {
    fn access_token<'a>(&'a self, http: &'a HttpClient) -> BoxFuture<'a, Result<String>> {
        async move {
            // Held across the fetch so concurrent callers share one refresh
            let mut cache = self.cache.lock().await;
            if let Some(token) = cache.get(Instant::now()) {
                return Ok(token.to_string());
            }
            let token = self.fetch_token(http).await?;
            cache.store(token.clone(), Instant::now());
            info!("SGIS access token refreshed");
            Ok(token)
        }
        .boxed()
    }
}
