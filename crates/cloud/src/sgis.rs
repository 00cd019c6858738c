//! Async client for the SGIS (Statistical Geographic Information Service)
//! OpenAPI: access tokens, population statistics and administrative
//! boundaries.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};
use hotspot_core::FeatureCollection;
use tracing::{debug, info};

use crate::auth::{AccessTokenProvider, SgisAuth, SgisCredentials};
use crate::cache::DEFAULT_TOKEN_LIFETIME;
use crate::error::{CloudError, Result};
use crate::http::HttpClient;
use crate::models::{status_code, ApiEnvelope, PopulationItem};

/// Default API root
pub const SGIS_BASE_URL: &str = "https://sgisapi.kostat.go.kr/OpenAPI3";

/// Province-level (시도) codes covering the whole country
pub const SIDO_CODES: [&str; 17] = [
    "11", "21", "22", "23", "24", "25", "26", "29", "31", "32", "33", "34", "35", "36", "37",
    "38", "39",
];

/// Reference years with published statistics and boundaries
pub const AVAILABLE_YEARS: std::ops::RangeInclusive<u16> = 2015..=2023;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for [`SgisClient`].
#[derive(Debug, Clone)]
pub struct SgisClientOptions {
    /// API root (default [`SGIS_BASE_URL`]).
    pub base_url: String,
    /// Per-request timeout (default 20 s).
    pub request_timeout: Duration,
    /// Maximum retries on transient failures (default 3).
    pub max_retries: u32,
    /// Maximum partitions fetched at once (default 8).
    pub max_concurrency: usize,
    /// Lifetime of a cached access token (default 3600 s).
    pub token_lifetime: Duration,
}

impl Default for SgisClientOptions {
    fn default() -> Self {
        Self {
            base_url: SGIS_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(20),
            max_retries: 3,
            max_concurrency: 8,
            token_lifetime: DEFAULT_TOKEN_LIFETIME,
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Parameters shared by the statistics and boundary endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaQuery {
    /// Reference year
    pub year: u16,
    /// Parent administrative code; the whole country when `None`
    pub adm_cd: Option<String>,
    /// Descend one level below `adm_cd` (`low_search=1`)
    pub low_search: bool,
}

impl AreaQuery {
    /// Children of `adm_cd` in `year`.
    pub fn children_of(year: u16, adm_cd: impl Into<String>) -> Self {
        Self {
            year,
            adm_cd: Some(adm_cd.into()),
            low_search: true,
        }
    }

    fn params<'a>(&'a self, token: &'a str, year: &'a str) -> Vec<(&'a str, &'a str)> {
        let mut params = vec![
            ("accessToken", token),
            ("year", year),
            ("low_search", if self.low_search { "1" } else { "0" }),
        ];
        if let Some(code) = &self.adm_cd {
            params.push(("adm_cd", code.as_str()));
        }
        params
    }
}

impl Default for AreaQuery {
    fn default() -> Self {
        Self {
            year: 2023,
            adm_cd: None,
            low_search: true,
        }
    }
}

/// Population rows and boundaries of one province.
#[derive(Debug, Clone)]
pub struct Partition {
    pub sido: String,
    pub population: Vec<PopulationItem>,
    /// Boundaries in EPSG:5179
    pub boundary: FeatureCollection,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Async SGIS client.
#[derive(Clone)]
pub struct SgisClient {
    http: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    options: SgisClientOptions,
}

impl SgisClient {
    /// Create a client that authenticates with `credentials`.
    pub fn new(credentials: SgisCredentials, options: SgisClientOptions) -> Result<Self> {
        let auth = SgisAuth::new(credentials, &options.base_url, options.token_lifetime);
        Self::with_provider(Arc::new(auth), options)
    }

    /// Create a client with credentials from the environment.
    pub fn from_env(options: SgisClientOptions) -> Result<Self> {
        Self::new(SgisCredentials::from_env()?, options)
    }

    /// Create a client around any token provider.
    pub fn with_provider(
        auth: Arc<dyn AccessTokenProvider>,
        options: SgisClientOptions,
    ) -> Result<Self> {
        let http = HttpClient::new(options.request_timeout, options.max_retries)?;
        Ok(Self { http, auth, options })
    }

    pub fn options(&self) -> &SgisClientOptions {
        &self.options
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.options.base_url.trim_end_matches('/'), path)
    }

    /// A currently valid access token.
    pub async fn access_token(&self) -> Result<String> {
        self.auth.access_token(&self.http).await
    }

    /// Population statistics for the areas selected by `query`.
    pub async fn population(&self, query: &AreaQuery) -> Result<Vec<PopulationItem>> {
        let token = self.access_token().await?;
        let year = query.year.to_string();
        let url = self.url("stats/population.json");
        let envelope: ApiEnvelope<Vec<PopulationItem>> =
            self.http.get_json(&url, &query.params(&token, &year)).await?;
        envelope.into_result()
    }

    /// Administrative boundaries (EPSG:5179) for the areas selected by `query`.
    pub async fn boundary(&self, query: &AreaQuery) -> Result<FeatureCollection> {
        let token = self.access_token().await?;
        let year = query.year.to_string();
        let url = self.url("boundary/hadmarea.geojson");
        let collection: FeatureCollection =
            self.http.get_json(&url, &query.params(&token, &year)).await?;
        check_collection_status(&collection)?;
        Ok(collection)
    }

    /// Population and boundaries of the municipalities of one province.
    pub async fn fetch_partition(&self, year: u16, sido: &str) -> Result<Partition> {
        let query = AreaQuery::children_of(year, sido);
        let (population, boundary) =
            tokio::try_join!(self.population(&query), self.boundary(&query))?;
        debug!(
            "partition {}: {} statistics rows, {} boundaries",
            sido,
            population.len(),
            boundary.len()
        );
        Ok(Partition {
            sido: sido.to_string(),
            population,
            boundary,
        })
    }

    /// Fetch every province with at most `max_concurrency` in flight.
    ///
    /// Returns only after all partitions completed; any failure fails the
    /// whole fetch. Partitions are returned in province-code order.
    pub async fn fetch_nationwide(&self, year: u16) -> Result<Vec<Partition>> {
        info!(
            "Fetching {} provinces for {} ({} concurrent)",
            SIDO_CODES.len(),
            year,
            self.options.max_concurrency
        );
        let mut partitions: Vec<Partition> = stream::iter(SIDO_CODES)
            .map(|sido| self.fetch_partition(year, sido))
            .buffer_unordered(self.options.max_concurrency.max(1))
            .try_collect()
            .await?;
        partitions.sort_by(|a, b| a.sido.cmp(&b.sido));
        Ok(partitions)
    }
}

/// Boundary responses carry `errCd` as a foreign member on failure.
fn check_collection_status(collection: &FeatureCollection) -> Result<()> {
    let code = collection.extra.get("errCd").and_then(status_code);
    match code {
        Some(code) if code != 0 => Err(CloudError::Api {
            code,
            message: collection
                .extra
                .get("errMsg")
                .and_then(|m| m.as_str())
                .unwrap_or("boundary request failed")
                .to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;

    #[test]
    fn test_default_options() {
        let o = SgisClientOptions::default();
        assert_eq!(o.base_url, SGIS_BASE_URL);
        assert_eq!(o.request_timeout, Duration::from_secs(20));
        assert_eq!(o.max_retries, 3);
        assert_eq!(o.max_concurrency, 8);
        assert_eq!(o.token_lifetime, Duration::from_secs(3600));
    }

    #[test]
    fn test_query_params() {
        let q = AreaQuery::children_of(2023, "11");
        let params = q.params("tok", "2023");
        assert!(params.contains(&("accessToken", "tok")));
        assert!(params.contains(&("low_search", "1")));
        assert!(params.contains(&("adm_cd", "11")));

        let nationwide = AreaQuery::default();
        assert!(!nationwide.params("t", "2023").iter().any(|(k, _)| *k == "adm_cd"));
    }

    #[test]
    fn test_collection_status() {
        let ok: FeatureCollection =
            serde_json::from_str(r#"{"type":"FeatureCollection","features":[],"errCd":0}"#).unwrap();
        assert!(check_collection_status(&ok).is_ok());

        let bare: FeatureCollection =
            serde_json::from_str(r#"{"type":"FeatureCollection","features":[]}"#).unwrap();
        assert!(check_collection_status(&bare).is_ok());

        let failed: FeatureCollection =
            serde_json::from_str(r#"{"features":[],"errCd":-401,"errMsg":"expired"}"#).unwrap();
        match check_collection_status(&failed) {
            Err(CloudError::Api { code, message }) => {
                assert_eq!(code, -401);
                assert_eq!(message, "expired");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_sido_codes() {
        assert_eq!(SIDO_CODES.len(), 17);
        assert!(SIDO_CODES.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(AVAILABLE_YEARS.count(), 9);
    }

    #[tokio::test]
    async fn test_static_token_provider() {
        let client = SgisClient::with_provider(
            Arc::new(StaticToken("fixed".into())),
            SgisClientOptions::default(),
        )
        .unwrap();
        assert_eq!(client.access_token().await.unwrap(), "fixed");
        assert_eq!(client.url("stats/population.json"), format!("{}/stats/population.json", SGIS_BASE_URL));
    }
}
