//! Local Getis-Ord Gi* hotspot statistic
//!
//! Uses the global mean and standard deviation of all regions:
//!
//! ```text
//! Gi* = (Σj wij·xj − x̄·Σj wij) / (s · sqrt((n·Σj wij² − (Σj wij)²) / (n − 1)))
//! ```
//!
//! Reference:
//! Ord, J.K. & Getis, A. (1995). Local spatial autocorrelation statistics:
//! distributional issues and an application. Geographical Analysis, 27(4).

use hotspot_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::normal::two_sided_p;
use super::{check_inputs, mean_and_std};
use crate::weights::WeightMatrix;

/// Parameters for Gi*
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GetisOrdParams {
    /// Denominator used when the variance term is not positive
    pub denominator_floor: f64,
}

impl Default for GetisOrdParams {
    fn default() -> Self {
        Self {
            denominator_floor: 1e-10,
        }
    }
}

/// Hotspot / coldspot confidence class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GiClass {
    #[serde(rename = "hot_99")]
    Hot99,
    #[serde(rename = "hot_95")]
    Hot95,
    #[serde(rename = "hot_90")]
    Hot90,
    #[serde(rename = "cold_99")]
    Cold99,
    #[serde(rename = "cold_95")]
    Cold95,
    #[serde(rename = "cold_90")]
    Cold90,
    #[serde(rename = "ns")]
    NotSignificant,
}

impl GiClass {
    /// Classify a z-score / p-value pair. The first matching rule wins.
    pub fn classify(z: f64, p: f64) -> Self {
        if z >= 2.58 && p <= 0.01 {
            Self::Hot99
        } else if z >= 1.96 && p <= 0.05 {
            Self::Hot95
        } else if z >= 1.65 && p <= 0.10 {
            Self::Hot90
        } else if z <= -2.58 && p <= 0.01 {
            Self::Cold99
        } else if z <= -1.96 && p <= 0.05 {
            Self::Cold95
        } else if z <= -1.65 && p <= 0.10 {
            Self::Cold90
        } else {
            Self::NotSignificant
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot99 => "hot_99",
            Self::Hot95 => "hot_95",
            Self::Hot90 => "hot_90",
            Self::Cold99 => "cold_99",
            Self::Cold95 => "cold_95",
            Self::Cold90 => "cold_90",
            Self::NotSignificant => "ns",
        }
    }

    pub fn is_hot(&self) -> bool {
        matches!(self, Self::Hot99 | Self::Hot95 | Self::Hot90)
    }

    pub fn is_cold(&self) -> bool {
        matches!(self, Self::Cold99 | Self::Cold95 | Self::Cold90)
    }
}

impl fmt::Display for GiClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gi* result for one region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GetisOrdStat {
    /// Gi* z-score
    pub z: f64,
    /// Two-sided p-value
    pub p: f64,
    pub class: GiClass,
}

/// Compute Gi* for every region
///
/// # Arguments
/// * `values` - One value per region, in weight-matrix order
/// * `weights` - Binary neighbor matrix
/// * `params` - Denominator floor
///
/// # Returns
/// One [`GetisOrdStat`] per region. Constant input yields z = 0 everywhere;
/// regions without neighbors get z = 0 through the denominator floor.
pub fn getis_ord_gi_star(
    values: &[f64],
    weights: &WeightMatrix,
    params: &GetisOrdParams,
) -> Result<Vec<GetisOrdStat>> {
    check_inputs(values, weights)?;
    if !(params.denominator_floor > 0.0) {
        return Err(Error::InvalidParameter {
            name: "denominator_floor",
            value: params.denominator_floor.to_string(),
            reason: "must be positive".into(),
        });
    }

    let n = values.len() as f64;
    let (mean, s) = mean_and_std(values);

    if s.abs() < f64::EPSILON {
        // All values identical
        return Ok(vec![
            GetisOrdStat {
                z: 0.0,
                p: 1.0,
                class: GiClass::NotSignificant,
            };
            values.len()
        ]);
    }

    let stats = (0..weights.len())
        .map(|i| {
            let row = weights.row(i);
            let mut wx = 0.0;
            let mut sum_w = 0.0;
            let mut sum_w2 = 0.0;
            for (&w, &x) in row.iter().zip(values) {
                let w = f64::from(w);
                wx += w * x;
                sum_w += w;
                sum_w2 += w * w;
            }

            let numerator = wx - mean * sum_w;
            let denom_inner = (n * sum_w2 - sum_w * sum_w) / (n - 1.0);
            let denominator = if denom_inner > 0.0 {
                s * denom_inner.sqrt()
            } else {
                params.denominator_floor
            };

            let z = numerator / denominator;
            let p = two_sided_p(z);
            GetisOrdStat {
                z,
                p,
                class: GiClass::classify(z, p),
            }
        })
        .collect();

    Ok(stats)
}
