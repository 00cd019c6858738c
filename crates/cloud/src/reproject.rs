//! Reprojection of boundary GeoJSON between the Korea 2000 Unified CS
//! (EPSG:5179) and WGS84 (EPSG:4326).
//!
//! Statistics and adjacency run on the projected coordinates; lon/lat is
//! only produced for display.

use hotspot_core::crs::TransverseMercator;
use hotspot_core::{FeatureCollection, CRS};

use crate::error::{CloudError, Result};

/// Decimal places kept for geographic output (about 1 cm).
pub const GEOGRAPHIC_DECIMALS: i32 = 7;

/// Reproject every geometry of `collection` from `from` to `to`.
///
/// Supported pairs are the identity, EPSG:5179 → 4326 and 4326 → 5179.
/// Geographic output is rounded to [`GEOGRAPHIC_DECIMALS`].
pub fn reproject_collection(collection: &mut FeatureCollection, from: CRS, to: CRS) -> Result<()> {
    if from == to {
        return Ok(());
    }
    match (from.projection(), to.projection()) {
        (Some(tm), None) if to == CRS::wgs84() => {
            collection.map_positions(&|[e, n]| {
                let (lon, lat) = tm.inverse(e, n);
                [round_to(lon, GEOGRAPHIC_DECIMALS), round_to(lat, GEOGRAPHIC_DECIMALS)]
            });
            Ok(())
        }
        (None, Some(tm)) if from == CRS::wgs84() => {
            collection.map_positions(&|[lon, lat]| {
                let (e, n) = tm.forward(lon, lat);
                [e, n]
            });
            Ok(())
        }
        _ => Err(CloudError::Parse(format!(
            "unsupported reprojection {} -> {}",
            from, to
        ))),
    }
}

/// Convert an SGIS boundary collection to lon/lat.
pub fn boundary_to_wgs84(collection: &mut FeatureCollection) -> Result<()> {
    reproject_collection(collection, CRS::korea_unified(), CRS::wgs84())
}

/// Project a single lon/lat position to EPSG:5179.
pub fn to_korea_unified(lon: f64, lat: f64) -> (f64, f64) {
    TransverseMercator::korea_unified().forward(lon, lat)
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (v * factor).round() / factor
}
