//! HTTP client wrapper with JSON decoding and retry logic.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{CloudError, Result};

/// HTTP client for the SGIS JSON endpoints.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
    request_timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new(request_timeout: Duration, max_retries: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            max_retries,
            request_timeout,
        })
    }

    /// GET `url` with `query` and decode the JSON body.
    ///
    /// Query values are not logged; they carry credentials and tokens.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        debug!("GET {}", url);
        let resp = self.execute_with_retry(url, query).await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CloudError::Network(format!(
                "HTTP {} fetching {}",
                status, url
            )));
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send with exponential backoff on timeouts, connection failures and
    /// 5xx responses. Other failures are returned at once.
    async fn execute_with_retry(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response> {
        let mut attempt = 0;
        loop {
            if attempt > 0 {
                let backoff = Duration::from_millis(100u64 * 2u64.pow(attempt - 1));
                tokio::time::sleep(backoff).await;
            }

            let outcome = self.client.get(url).query(query).send().await;
            let retries_left = attempt < self.max_retries;
            match outcome {
                Ok(resp) if is_retryable_status(resp.status()) && retries_left => {
                    warn!("HTTP {} from {}, retrying", resp.status(), url);
                }
                Ok(resp) => return Ok(resp),
                Err(e) if (e.is_timeout() || e.is_connect()) && retries_left => {
                    warn!("request to {} failed ({}), retrying", url, e);
                }
                Err(e) => return Err(e.into()),
            }
            attempt += 1;
        }
    }

    /// Getter for the timeout duration.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}
