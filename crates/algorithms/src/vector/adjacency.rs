//! Polygon adjacency: do two regions touch, and along what?
//!
//! Two regions touch when their boundaries meet and their interiors do not
//! overlap (DE-9IM `touches`). The shared boundary is then classified by
//! its dimension: a shared edge (rook adjacency) has one-dimensional
//! extent, a shared corner (bishop adjacency) is zero-dimensional.

use std::panic::{catch_unwind, AssertUnwindSafe};

use geo::relate::IntersectionMatrix;
use geo::{MultiPolygon, Relate};
use hotspot_core::{BoundingBox, Error, Result};

use super::repair::repair_multi_polygon;

/// Default bounding-box margin in coordinate units (metres).
pub const DEFAULT_BBOX_MARGIN: f64 = 1e-3;

/// DE-9IM pattern: interiors disjoint and a one-dimensional boundary overlap.
const SHARED_EDGE_PATTERN: &str = "F***1****";

/// Dimension of the boundary shared by two touching regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdjacencyKind {
    /// At least one shared boundary segment
    Edge,
    /// Only isolated shared points
    Vertex,
}

/// A repaired region boundary with its envelope, ready for pairwise tests.
#[derive(Debug, Clone)]
pub struct PreparedGeometry {
    geometry: MultiPolygon<f64>,
    bbox: BoundingBox,
}

impl PreparedGeometry {
    /// Repair `geom` and compute its envelope.
    ///
    /// Returns `None` when the geometry is empty or cannot be repaired; such
    /// a region takes part in no adjacency.
    pub fn new(geom: &MultiPolygon<f64>) -> Option<Self> {
        let geometry = repair_multi_polygon(geom)?;
        let bbox = BoundingBox::of_multi_polygon(&geometry)?;
        Some(Self { geometry, bbox })
    }

    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }
}

/// Envelope pre-check: `false` proves the regions cannot touch.
pub fn bboxes_may_touch(a: &PreparedGeometry, b: &PreparedGeometry, margin: f64) -> bool {
    a.bbox.expand(margin).intersects(&b.bbox)
}

fn relate(a: &PreparedGeometry, b: &PreparedGeometry) -> Result<IntersectionMatrix> {
    catch_unwind(AssertUnwindSafe(|| a.geometry.relate(&b.geometry)))
        .map_err(|_| Error::Geometry("relate computation failed".into()))
}

/// Whether `a` and `b` share boundary points without overlapping interiors.
pub fn touches(a: &PreparedGeometry, b: &PreparedGeometry) -> Result<bool> {
    Ok(relate(a, b)?.is_touches())
}

/// Classify the shared boundary of two touching regions.
///
/// Only meaningful when [`touches`] holds; returns `Ok(None)` otherwise.
pub fn adjacency_kind(a: &PreparedGeometry, b: &PreparedGeometry) -> Result<Option<AdjacencyKind>> {
    classify(&relate(a, b)?)
}

/// Bounding-box check followed by a single exact relate.
///
/// `Ok(None)` means not adjacent. `Err` means the topology could not be
/// computed for this pair.
pub fn evaluate_pair(
    a: &PreparedGeometry,
    b: &PreparedGeometry,
    margin: f64,
) -> Result<Option<AdjacencyKind>> {
    if !bboxes_may_touch(a, b, margin) {
        return Ok(None);
    }
    classify(&relate(a, b)?)
}

fn classify(im: &IntersectionMatrix) -> Result<Option<AdjacencyKind>> {
    if !im.is_touches() {
        return Ok(None);
    }
    let shares_edge = im
        .matches(SHARED_EDGE_PATTERN)
        .map_err(|e| Error::Geometry(format!("invalid DE-9IM pattern: {:?}", e)))?;
    Ok(Some(if shares_edge {
        AdjacencyKind::Edge
    } else {
        AdjacencyKind::Vertex
    }))
}
