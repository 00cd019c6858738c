//! Administrative regions, the unit of analysis

use geo_types::MultiPolygon;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vector::BoundingBox;

/// One administrative region with its analysis value and location.
///
/// Coordinates and geometry are in the projected (metre) plane shared by
/// every region of an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Administrative code, unique within an analysis
    pub code: String,
    /// Display name
    pub name: String,
    /// Scalar analysis value
    pub value: f64,
    /// Representative point, easting (m)
    pub x: f64,
    /// Representative point, northing (m)
    pub y: f64,
    /// Boundary, required only by contiguity weights
    #[serde(skip)]
    pub geometry: Option<MultiPolygon<f64>>,
}

impl Region {
    pub fn new(code: impl Into<String>, name: impl Into<String>, value: f64, x: f64, y: f64) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            value,
            x,
            y,
            geometry: None,
        }
    }

    /// Attach a boundary geometry
    pub fn with_geometry(mut self, geometry: impl Into<MultiPolygon<f64>>) -> Self {
        self.geometry = Some(geometry.into());
        self
    }

    /// Projected coordinate as `(x, y)`
    pub fn coord(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Bounding box of the boundary geometry
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.geometry.as_ref().and_then(BoundingBox::of_multi_polygon)
    }

    /// Check that value and coordinate are finite numbers.
    pub fn validate(&self) -> Result<()> {
        if !self.value.is_finite() {
            return Err(Error::MissingData {
                what: "finite value",
                code: self.code.clone(),
            });
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(Error::MissingData {
                what: "finite coordinate",
                code: self.code.clone(),
            });
        }
        Ok(())
    }
}

/// Sort regions by code and reject duplicates.
///
/// The returned order is the index space for weight matrices and result
/// vectors of one analysis.
pub fn align_regions(mut regions: Vec<Region>) -> Result<Vec<Region>> {
    regions.sort_by(|a, b| a.code.cmp(&b.code));
    if let Some(pair) = regions.windows(2).find(|w| w[0].code == w[1].code) {
        return Err(Error::DuplicateRegion(pair[0].code.clone()));
    }
    Ok(regions)
}
