//! Spatial weight matrices
//!
//! Neighbor definitions over a fixed, ordered set of regions:
//! - **knn**: k nearest representative points
//! - **distance**: all representative points within a radius
//! - **contiguity**: shared boundaries (rook, bishop, queen)

mod contiguity;
mod distance;
mod knn;
mod matrix;

pub use contiguity::{contiguity_weights, ContiguityKind, ContiguityParams};
pub use distance::distance_weights;
pub use knn::knn_weights;
pub use matrix::WeightMatrix;

use hotspot_core::{Error, Region, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Neighbor definition together with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WeightStrategy {
    /// k nearest neighbors by planar distance
    Knn { k: usize },
    /// Every region within `radius` metres
    Distance { radius: f64 },
    /// Shared boundary of the given kind
    Contiguity { kind: ContiguityKind },
}

impl WeightStrategy {
    /// Short name of the strategy
    pub fn name(&self) -> &'static str {
        match self {
            Self::Knn { .. } => "knn",
            Self::Distance { .. } => "distance",
            Self::Contiguity { kind } => kind.name(),
        }
    }

    /// Fewest regions an analysis with this strategy accepts.
    pub fn min_regions(&self) -> usize {
        match self {
            Self::Knn { k } => k.saturating_add(1),
            _ => 2,
        }
    }

    /// Whether the strategy needs boundary geometry
    pub fn needs_geometry(&self) -> bool {
        matches!(self, Self::Contiguity { .. })
    }

    /// Fail unless `n` regions are enough for this strategy.
    pub fn check_region_count(&self, n: usize) -> Result<()> {
        let needed = self.min_regions();
        if n < needed {
            return Err(Error::InsufficientRegions {
                strategy: self.to_string(),
                needed,
                found: n,
            });
        }
        Ok(())
    }

    /// Build the weight matrix over `regions`, in the given order.
    pub fn build(&self, regions: &[Region]) -> Result<WeightMatrix> {
        match *self {
            Self::Knn { k } => knn_weights(&coords_of(regions), k),
            Self::Distance { radius } => distance_weights(&coords_of(regions), radius),
            Self::Contiguity { kind } => {
                let geoms: Vec<_> = regions.iter().map(|r| r.geometry.as_ref()).collect();
                contiguity_weights(
                    &geoms,
                    ContiguityParams {
                        kind,
                        ..Default::default()
                    },
                )
            }
        }
    }
}

impl Default for WeightStrategy {
    fn default() -> Self {
        Self::Knn { k: 8 }
    }
}

impl fmt::Display for WeightStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Knn { k } => write!(f, "knn (k={})", k),
            Self::Distance { radius } => write!(f, "distance (r={} m)", radius),
            Self::Contiguity { kind } => write!(f, "{} contiguity", kind),
        }
    }
}

fn coords_of(regions: &[Region]) -> Vec<(f64, f64)> {
    regions.iter().map(Region::coord).collect()
}
