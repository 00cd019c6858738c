//! Blocking (synchronous) API for native platforms.
//!
//! Wraps the async [`SgisClient`] with a Tokio runtime so callers don't need
//! to manage their own async runtime.

#[cfg(feature = "native")]
mod inner {
    use hotspot_core::{FeatureCollection, Region};

    use crate::error::{CloudError, Result};
    use crate::models::PopulationItem;
    use crate::regions::{assemble_regions, Variable};
    use crate::sgis::{AreaQuery, Partition, SgisClient};

    /// Blocking wrapper around [`SgisClient`].
    ///
    /// Uses an internal current-thread Tokio runtime.
    pub struct SgisClientBlocking {
        rt: tokio::runtime::Runtime,
        inner: SgisClient,
    }

    impl SgisClientBlocking {
        /// Wrap an async client.
        pub fn new(inner: SgisClient) -> Result<Self> {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| CloudError::Network(e.to_string()))?;
            Ok(Self { rt, inner })
        }

        /// A currently valid access token (blocking).
        pub fn access_token(&self) -> Result<String> {
            self.rt.block_on(self.inner.access_token())
        }

        /// Population statistics (blocking).
        pub fn population(&self, query: &AreaQuery) -> Result<Vec<PopulationItem>> {
            self.rt.block_on(self.inner.population(query))
        }

        /// Boundaries in EPSG:5179 (blocking).
        pub fn boundary(&self, query: &AreaQuery) -> Result<FeatureCollection> {
            self.rt.block_on(self.inner.boundary(query))
        }

        /// All provinces, fully joined (blocking).
        pub fn fetch_nationwide(&self, year: u16) -> Result<Vec<Partition>> {
            self.rt.block_on(self.inner.fetch_nationwide(year))
        }

        /// Nationwide municipality regions for `variable` (blocking).
        pub fn fetch_regions(&self, year: u16, variable: Variable) -> Result<Vec<Region>> {
            let partitions = self.fetch_nationwide(year)?;
            Ok(assemble_regions(&partitions, variable))
        }

        pub fn client(&self) -> &SgisClient {
            &self.inner
        }
    }
}

#[cfg(feature = "native")]
pub use inner::*;
