//! Coordinate Reference System handling
//!
//! Region statistics arrive in the Korea 2000 Unified Coordinate System
//! (EPSG:5179), a transverse Mercator projection on the GRS80 ellipsoid.
//! All distance and adjacency computations run in that metric plane; the
//! geographic (EPSG:4326) form is only produced for display.
//!
//! Projection formulas follow Snyder (1987), USGS Prof. Paper 1395, pp. 61-64.

use serde::{Deserialize, Serialize};
use std::fmt;

mod transverse_mercator;

pub use transverse_mercator::{Ellipsoid, TransverseMercator};

/// EPSG code of WGS84 geographic coordinates
pub const EPSG_WGS84: u32 = 4326;
/// EPSG code of the Korea 2000 Unified Coordinate System
pub const EPSG_KOREA_UNIFIED: u32 = 5179;

/// Coordinate Reference System representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CRS {
    epsg: u32,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self { epsg: code }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(EPSG_WGS84)
    }

    /// Korea 2000 Unified CS (EPSG:5179)
    pub fn korea_unified() -> Self {
        Self::from_epsg(EPSG_KOREA_UNIFIED)
    }

    /// Get EPSG code
    pub fn epsg(&self) -> u32 {
        self.epsg
    }

    /// Whether coordinates in this CRS are linear (metres)
    pub fn is_projected(&self) -> bool {
        self.projection().is_some()
    }

    /// Projection parameters for supported projected systems.
    pub fn projection(&self) -> Option<TransverseMercator> {
        match self.epsg {
            EPSG_KOREA_UNIFIED => Some(TransverseMercator::korea_unified()),
            _ => None,
        }
    }

    /// Get a string identifier for this CRS
    pub fn identifier(&self) -> String {
        format!("EPSG:{}", self.epsg)
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for CRS {
    fn default() -> Self {
        Self::korea_unified()
    }
}
