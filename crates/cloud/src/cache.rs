//! Single-entry access token cache.

use std::time::{Duration, Instant};

/// Lifetime SGIS grants an access token.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Holds at most one token together with its expiry.
///
/// Time is passed in by the caller so expiry can be tested without waiting.
#[derive(Debug, Clone)]
pub struct TokenCache {
    entry: Option<(String, Instant)>,
    lifetime: Duration,
}

impl TokenCache {
    /// Create an empty cache whose tokens live for `lifetime`.
    pub fn new(lifetime: Duration) -> Self {
        Self {
            entry: None,
            lifetime,
        }
    }

    /// The cached token, if it is still valid at `now`.
    pub fn get(&self, now: Instant) -> Option<&str> {
        match &self.entry {
            Some((token, expires_at)) if now < *expires_at => Some(token.as_str()),
            _ => None,
        }
    }

    /// Store a token fetched at `now`.
    pub fn store(&mut self, token: impl Into<String>, now: Instant) {
        self.entry = Some((token.into(), now + self.lifetime));
    }

    /// Expiry instant of the cached token.
    pub fn expires_at(&self) -> Option<Instant> {
        self.entry.as_ref().map(|(_, at)| *at)
    }

    /// Forget the cached token.
    pub fn clear(&mut self) {
        self.entry = None;
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_LIFETIME)
    }
}
