//! Global Moran's I for a whole set of regions
//!
//! Overall clustering diagnostic reported alongside the local statistics.
//! Inference uses the normality assumption.

use hotspot_core::{Error, Result};
use serde::{Deserialize, Serialize};

use super::check_inputs;
use super::normal::two_sided_p;
use crate::weights::WeightMatrix;

/// Result of Global Moran's I computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoransIResult {
    /// Moran's I statistic
    pub i: f64,
    /// Expected I under randomness
    pub expected: f64,
    /// Z-score
    pub z_score: f64,
    /// P-value (two-tailed)
    pub p_value: f64,
}

/// Compute Global Moran's I over binary weights
///
/// # Arguments
/// * `values` - One value per region, in weight-matrix order
/// * `weights` - Binary neighbor matrix, used as is
///
/// # Returns
/// MoransIResult with I statistic, z-score, and p-value
pub fn global_morans_i(values: &[f64], weights: &WeightMatrix) -> Result<MoransIResult> {
    check_inputs(values, weights)?;
    let n = values.len() as f64;
    if values.len() < 3 {
        return Err(Error::InsufficientRegions {
            strategy: "global Moran's I".into(),
            needed: 3,
            found: values.len(),
        });
    }

    let mean = values.iter().sum::<f64>() / n;
    let deviations: Vec<f64> = values.iter().map(|v| v - mean).collect();
    let sum_sq = deviations.iter().map(|d| d * d).sum::<f64>();
    let expected = -1.0 / (n - 1.0);

    let s0 = weights.link_count() as f64;
    if sum_sq.abs() < f64::EPSILON || s0 == 0.0 {
        return Ok(MoransIResult {
            i: 0.0,
            expected,
            z_score: 0.0,
            p_value: 1.0,
        });
    }

    // Σ wij·di·dj
    let mut numerator = 0.0;
    for i in 0..weights.len() {
        for j in weights.neighbors(i) {
            numerator += deviations[i] * deviations[j];
        }
    }
    let morans_i = (n / s0) * (numerator / sum_sq);

    // S1 = ½ Σ (wij + wji)², S2 = Σ (row_i + col_i)²
    let w = weights.as_array();
    let mut s1 = 0.0;
    for i in 0..weights.len() {
        for j in 0..weights.len() {
            let sym = f64::from(w[(i, j)]) + f64::from(w[(j, i)]);
            s1 += sym * sym;
        }
    }
    s1 *= 0.5;
    let s2: f64 = (0..weights.len())
        .map(|i| {
            let out_deg = f64::from(w.row(i).iter().map(|&v| u32::from(v)).sum::<u32>());
            let in_deg = f64::from(w.column(i).iter().map(|&v| u32::from(v)).sum::<u32>());
            (out_deg + in_deg) * (out_deg + in_deg)
        })
        .sum();

    let var_i = (n * n * s1 - n * s2 + 3.0 * s0 * s0) / ((n * n - 1.0) * s0 * s0)
        - expected * expected;

    let (z_score, p_value) = if var_i > 0.0 {
        let z = (morans_i - expected) / var_i.sqrt();
        (z, two_sided_p(z))
    } else {
        (0.0, 1.0)
    };

    Ok(MoransIResult {
        i: morans_i,
        expected,
        z_score,
        p_value,
    })
}
