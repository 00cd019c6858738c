//! Local Moran's I (LISA) with conditional permutation inference
//!
//! For standardized values z and row-standardized weights w:
//!
//! ```text
//! lag_i = Σj wij·zj        I_i = z_i · lag_i
//! ```
//!
//! Significance fixes z_i and redraws its neighbors' values from the other
//! n − 1 standardized values. The pseudo p-value is
//! `(#{|I_perm| ≥ |I_i|} + 1) / (permutations + 1)`.
//!
//! Reference:
//! Anselin, L. (1995). Local indicators of spatial association—LISA.
//! Geographical Analysis, 27(2), 93-115.

use hotspot_core::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{check_inputs, mean_and_std};
use crate::weights::WeightMatrix;

/// Parameters for the permutation test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalMoranParams {
    /// Number of conditional permutations per region
    pub permutations: usize,
    /// Pseudo p-value at or below which a quadrant is reported
    pub significance: f64,
}

impl Default for LocalMoranParams {
    fn default() -> Self {
        Self {
            permutations: 199,
            significance: 0.05,
        }
    }
}

/// Moran scatterplot quadrant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// High value, high-valued neighbors
    HH,
    /// Low value, low-valued neighbors
    LL,
    /// High value, low-valued neighbors
    HL,
    /// Low value, high-valued neighbors
    LH,
}

impl Quadrant {
    /// Quadrant of a standardized value and its spatial lag.
    /// Everything that is not HH, LL or HL falls in LH, including z = 0.
    pub fn of(z: f64, lag: f64) -> Self {
        if z > 0.0 && lag > 0.0 {
            Self::HH
        } else if z < 0.0 && lag < 0.0 {
            Self::LL
        } else if z > 0.0 && lag < 0.0 {
            Self::HL
        } else {
            Self::LH
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HH => "HH",
            Self::LL => "LL",
            Self::HL => "HL",
            Self::LH => "LH",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cluster / outlier class after the significance test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoranClass {
    HH,
    LL,
    HL,
    LH,
    #[serde(rename = "ns")]
    NotSignificant,
}

impl MoranClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HH => "HH",
            Self::LL => "LL",
            Self::HL => "HL",
            Self::LH => "LH",
            Self::NotSignificant => "ns",
        }
    }
}

impl From<Quadrant> for MoranClass {
    fn from(q: Quadrant) -> Self {
        match q {
            Quadrant::HH => Self::HH,
            Quadrant::LL => Self::LL,
            Quadrant::HL => Self::HL,
            Quadrant::LH => Self::LH,
        }
    }
}

impl fmt::Display for MoranClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local Moran's I result for one region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalMoranStat {
    /// Local I
    pub i: f64,
    /// Standardized value of the region
    pub z: f64,
    /// Spatial lag of the standardized values
    pub lag: f64,
    pub quadrant: Quadrant,
    /// Pseudo p-value from the permutation test
    pub p: f64,
    pub class: MoranClass,
}

/// Standardize with the population mean and standard deviation.
///
/// Constant input is only centered, which yields all zeros.
pub fn standardize(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let (mean, std) = mean_and_std(values);
    if std > 0.0 {
        values.iter().map(|v| (v - mean) / std).collect()
    } else {
        values.iter().map(|v| v - mean).collect()
    }
}

/// Compute Local Moran's I for every region.
///
/// # Arguments
/// * `values` - One value per region, in weight-matrix order
/// * `weights` - Binary neighbor matrix, row-standardized internally
/// * `params` - Permutation count and significance level
/// * `rng` - Source of randomness for the permutation test
///
/// # Returns
/// One [`LocalMoranStat`] per region. Regions without neighbors get p = 1
/// without drawing any permutation.
pub fn local_morans_i<R: Rng + ?Sized>(
    values: &[f64],
    weights: &WeightMatrix,
    params: &LocalMoranParams,
    rng: &mut R,
) -> Result<Vec<LocalMoranStat>> {
    check_inputs(values, weights)?;
    if params.permutations == 0 {
        return Err(Error::InvalidParameter {
            name: "permutations",
            value: "0".into(),
            reason: "at least one permutation is required".into(),
        });
    }
    if !(0.0..=1.0).contains(&params.significance) {
        return Err(Error::InvalidParameter {
            name: "significance",
            value: params.significance.to_string(),
            reason: "must lie in [0, 1]".into(),
        });
    }

    let n = values.len();
    let z = standardize(values);
    let w = weights.row_standardized();

    // Indices of every region except the current one; reshuffled in place
    let mut pool: Vec<usize> = Vec::with_capacity(n - 1);

    let mut stats = Vec::with_capacity(n);
    for i in 0..n {
        let row = w.row(i);
        let lag: f64 = row.iter().zip(&z).map(|(wij, zj)| wij * zj).sum();
        let local_i = z[i] * lag;
        let quadrant = Quadrant::of(z[i], lag);

        let neighbor_weights: Vec<f64> = row.iter().copied().filter(|&wij| wij > 0.0).collect();

        let p = if neighbor_weights.is_empty() {
            1.0
        } else {
            pool.clear();
            pool.extend((0..n).filter(|&j| j != i));
            let k = neighbor_weights.len();
            let observed = local_i.abs();

            let mut count = 0usize;
            for _ in 0..params.permutations {
                partial_shuffle(&mut pool, k, rng);
                let perm_lag: f64 = neighbor_weights
                    .iter()
                    .zip(&pool[..k])
                    .map(|(wij, &j)| wij * z[j])
                    .sum();
                if (z[i] * perm_lag).abs() >= observed {
                    count += 1;
                }
            }
            (count + 1) as f64 / (params.permutations + 1) as f64
        };

        let class = if p <= params.significance {
            MoranClass::from(quadrant)
        } else {
            MoranClass::NotSignificant
        };

        stats.push(LocalMoranStat {
            i: local_i,
            z: z[i],
            lag,
            quadrant,
            p,
            class,
        });
    }

    Ok(stats)
}

/// Partial Fisher-Yates: after the call `pool[..k]` is a uniform sample
/// without replacement from the whole pool.
fn partial_shuffle<R: Rng + ?Sized>(pool: &mut [usize], k: usize, rng: &mut R) {
    let n = pool.len();
    for a in 0..k.min(n) {
        let b = rng.gen_range(a..n);
        pool.swap(a, b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::knn_weights;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn line(n: usize) -> Vec<(f64, f64)> {
        (0..n).map(|i| (i as f64, 0.0)).collect()
    }

    #[test]
    fn test_standardize() {
        let z = standardize(&[1.0, 2.0, 3.0, 4.0, 10.0]);
        let n = z.len() as f64;
        assert_relative_eq!(z.iter().sum::<f64>(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(z.iter().map(|v| v * v).sum::<f64>() / n, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_standardize_constant() {
        assert_eq!(standardize(&[3.0, 3.0, 3.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_quadrants() {
        assert_eq!(Quadrant::of(1.0, 0.5), Quadrant::HH);
        assert_eq!(Quadrant::of(-1.0, -0.5), Quadrant::LL);
        assert_eq!(Quadrant::of(1.0, -0.5), Quadrant::HL);
        assert_eq!(Quadrant::of(-1.0, 0.5), Quadrant::LH);
        assert_eq!(Quadrant::of(0.0, -1.0), Quadrant::LH);
        assert_eq!(Quadrant::of(1.0, 0.0), Quadrant::LH);
    }

    #[test]
    fn test_lag_and_i() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let w = knn_weights(&line(5), 1).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let stats = local_morans_i(&values, &w, &LocalMoranParams::default(), &mut rng).unwrap();
        let z = standardize(&values);
        for (i, s) in stats.iter().enumerate() {
            let j = w.neighbors(i).next().unwrap();
            assert_relative_eq!(s.lag, z[j], epsilon = 1e-12);
            assert_relative_eq!(s.i, z[i] * z[j], epsilon = 1e-12);
        }
        assert_eq!(stats[0].quadrant, Quadrant::LL);
        assert_eq!(stats[4].quadrant, Quadrant::HH);
    }

    #[test]
    fn test_p_value_bounds() {
        let values: Vec<f64> = (0..30).map(|i| ((i * 37) % 11) as f64).collect();
        let w = knn_weights(&line(30), 4).unwrap();
        for perms in [1, 9, 99] {
            let params = LocalMoranParams {
                permutations: perms,
                ..Default::default()
            };
            let mut rng = StdRng::seed_from_u64(42);
            for s in local_morans_i(&values, &w, &params, &mut rng).unwrap() {
                assert!(s.p >= 1.0 / (perms + 1) as f64 - 1e-15);
                assert!(s.p <= 1.0);
            }
        }
    }

    #[test]
    fn test_isolated_region() {
        let mut w = WeightMatrix::zeros(4);
        w.link_both(0, 1);
        w.link_both(1, 2);
        let mut rng = StdRng::seed_from_u64(1);
        let stats =
            local_morans_i(&[1.0, 5.0, 2.0, 9.0], &w, &LocalMoranParams::default(), &mut rng).unwrap();
        assert_eq!(stats[3].lag, 0.0);
        assert_eq!(stats[3].p, 1.0);
        assert_eq!(stats[3].class, MoranClass::NotSignificant);
    }

    #[test]
    fn test_seeded_runs_identical() {
        let values: Vec<f64> = (0..20).map(|i| (i as f64).sin() * 10.0).collect();
        let w = knn_weights(&line(20), 3).unwrap();
        let params = LocalMoranParams::default();
        let a = local_morans_i(&values, &w, &params, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = local_morans_i(&values, &w, &params, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_strong_cluster_is_significant() {
        // Two far-apart groups of thirty, low on the left, high on the right
        let coords: Vec<(f64, f64)> = (0..60)
            .map(|i| if i < 30 { (i as f64, 0.0) } else { (1000.0 + i as f64, 0.0) })
            .collect();
        let values: Vec<f64> = (0..60).map(|i| if i < 30 { 1.0 } else { 100.0 }).collect();
        let w = knn_weights(&coords, 8).unwrap();
        let params = LocalMoranParams {
            permutations: 999,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(2024);
        let stats = local_morans_i(&values, &w, &params, &mut rng).unwrap();
        assert_eq!(stats[45].class, MoranClass::HH);
        assert_eq!(stats[15].class, MoranClass::LL);
    }

    #[test]
    fn test_zero_permutations_rejected() {
        let w = knn_weights(&line(5), 1).unwrap();
        let params = LocalMoranParams {
            permutations: 0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let err = local_morans_i(&[1.0; 5], &w, &params, &mut rng).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_class_serde() {
        assert_eq!(serde_json::to_string(&MoranClass::NotSignificant).unwrap(), "\"ns\"");
        assert_eq!(serde_json::to_string(&Quadrant::HL).unwrap(), "\"HL\"");
    }
}
