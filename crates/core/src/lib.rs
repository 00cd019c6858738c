//! # Hotspot Core
//!
//! Core types for regional hotspot analysis.
//!
//! This crate provides:
//! - `Region`: an administrative unit with value, coordinate and boundary
//! - `CRS` and the Korea 2000 transverse Mercator projection
//! - A typed GeoJSON model (`FeatureCollection`, `CoordinateTree`)
//! - The shared `Error` type

pub mod crs;
pub mod error;
pub mod region;
pub mod vector;

pub use crs::CRS;
pub use error::{Error, Result};
pub use region::{align_regions, Region};
pub use vector::{BoundingBox, CoordinateTree, Feature, FeatureCollection};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::CRS;
    pub use crate::error::{Error, Result};
    pub use crate::region::{align_regions, Region};
    pub use crate::vector::{BoundingBox, CoordinateTree, Feature, FeatureCollection, MapPositions};
}
