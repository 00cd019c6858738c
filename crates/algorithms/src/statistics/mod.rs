//! Spatial autocorrelation statistics over region weight matrices
//!
//! - **getis_ord**: Local Getis-Ord Gi* hotspot / coldspot z-scores
//! - **local_moran**: Local Moran's I with a conditional permutation test
//! - **global_moran**: Global Moran's I as a whole-map diagnostic

mod getis_ord;
mod global_moran;
mod local_moran;
mod normal;

pub use getis_ord::{getis_ord_gi_star, GetisOrdParams, GetisOrdStat, GiClass};
pub use global_moran::{global_morans_i, MoransIResult};
pub use local_moran::{
    local_morans_i, standardize, LocalMoranParams, LocalMoranStat, MoranClass, Quadrant,
};
pub use normal::{normal_cdf, two_sided_p};

use crate::weights::WeightMatrix;
use hotspot_core::{Error, Result};

/// Both inputs describe the same regions and there are at least two of them.
pub(crate) fn check_inputs(values: &[f64], weights: &WeightMatrix) -> Result<()> {
    if values.len() != weights.len() {
        return Err(Error::Algorithm(format!(
            "{} values for a {}x{} weight matrix",
            values.len(),
            weights.len(),
            weights.len()
        )));
    }
    if values.len() < 2 {
        return Err(Error::InsufficientRegions {
            strategy: "statistic".into(),
            needed: 2,
            found: values.len(),
        });
    }
    if let Some(i) = values.iter().position(|v| !v.is_finite()) {
        return Err(Error::Algorithm(format!("non-finite value at index {}", i)));
    }
    Ok(())
}

/// Mean and population standard deviation
pub(crate) fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}
