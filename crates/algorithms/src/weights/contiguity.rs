//! Polygon contiguity weights (rook, bishop, queen)

use geo::MultiPolygon;
use hotspot_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use super::WeightMatrix;
use crate::vector::{evaluate_pair, AdjacencyKind, PreparedGeometry, DEFAULT_BBOX_MARGIN};

/// Which shared boundaries make two regions neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContiguityKind {
    /// Shared edge only
    Rook,
    /// Shared corner only, no shared edge
    Bishop,
    /// Any shared boundary (rook ∪ bishop)
    Queen,
}

impl ContiguityKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rook => "rook",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
        }
    }

    fn accepts(&self, kind: AdjacencyKind) -> bool {
        match self {
            Self::Rook => kind == AdjacencyKind::Edge,
            Self::Bishop => kind == AdjacencyKind::Vertex,
            Self::Queen => true,
        }
    }
}

impl fmt::Display for ContiguityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters for contiguity weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContiguityParams {
    pub kind: ContiguityKind,
    /// Bounding-box pruning margin in coordinate units
    pub bbox_margin: f64,
}

impl Default for ContiguityParams {
    fn default() -> Self {
        Self {
            kind: ContiguityKind::Queen,
            bbox_margin: DEFAULT_BBOX_MARGIN,
        }
    }
}

/// Binary contiguity weights from region boundaries.
///
/// Regions without geometry, or whose geometry cannot be repaired, get an
/// empty row. A pair whose topology cannot be computed is treated as not
/// adjacent. The result is symmetric.
///
/// # Arguments
/// * `geometries` - Boundary per region, in analysis order
/// * `params` - Contiguity kind and pruning margin
pub fn contiguity_weights(
    geometries: &[Option<&MultiPolygon<f64>>],
    params: ContiguityParams,
) -> Result<WeightMatrix> {
    let n = geometries.len();
    let with_geometry = geometries.iter().filter(|g| g.is_some()).count();
    if with_geometry < 2 {
        return Err(Error::InsufficientRegions {
            strategy: format!("{} contiguity (regions with boundary)", params.kind),
            needed: 2,
            found: with_geometry,
        });
    }

    let prepared: Vec<Option<PreparedGeometry>> = geometries
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let g = (*g)?;
            let p = PreparedGeometry::new(g);
            if p.is_none() {
                warn!("contiguity: skipping unrepairable geometry at index {}", i);
            }
            p
        })
        .collect();

    let mut w = WeightMatrix::zeros(n);
    let mut failed_pairs = 0usize;

    for i in 0..n {
        let Some(a) = &prepared[i] else { continue };
        for j in (i + 1)..n {
            let Some(b) = &prepared[j] else { continue };
            match evaluate_pair(a, b, params.bbox_margin) {
                Ok(Some(kind)) if params.kind.accepts(kind) => w.link_both(i, j),
                Ok(_) => {}
                Err(e) => {
                    failed_pairs += 1;
                    debug!("contiguity: pair ({}, {}) treated as non-adjacent: {}", i, j, e);
                }
            }
        }
    }

    if failed_pairs > 0 {
        warn!("contiguity: {} pair(s) could not be evaluated", failed_pairs);
    }

    Ok(w)
}
