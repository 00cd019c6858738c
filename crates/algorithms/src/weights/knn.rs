//! k-nearest-neighbor weights

use hotspot_core::{Error, Result};
use tracing::debug;

use super::WeightMatrix;

/// Binary k-nearest-neighbor weights from planar coordinates.
///
/// For each region the distances to every other region are sorted with a
/// stable sort over ascending column index, so equal distances resolve to
/// the lower index. A `k` of `n` or more is clamped to `n - 1`.
///
/// # Arguments
/// * `coords` - Projected `(x, y)` per region, in analysis order
/// * `k` - Neighbors per region (must be > 0)
pub fn knn_weights(coords: &[(f64, f64)], k: usize) -> Result<WeightMatrix> {
    let n = coords.len();
    if k == 0 {
        return Err(Error::InvalidParameter {
            name: "k",
            value: k.to_string(),
            reason: "must be at least 1".into(),
        });
    }
    if n < 2 {
        return Err(Error::InsufficientRegions {
            strategy: format!("knn (k={})", k),
            needed: 2,
            found: n,
        });
    }

    let k_eff = k.min(n - 1);
    if k_eff < k {
        debug!("knn: clamping k={} to {} for {} regions", k, k_eff, n);
    }

    let mut w = WeightMatrix::zeros(n);
    let mut dists: Vec<(f64, usize)> = Vec::with_capacity(n - 1);

    for (i, &(xi, yi)) in coords.iter().enumerate() {
        dists.clear();
        for (j, &(xj, yj)) in coords.iter().enumerate() {
            if i == j {
                continue;
            }
            let dx = xi - xj;
            let dy = yi - yj;
            dists.push((dx * dx + dy * dy, j));
        }
        // Stable: ties keep ascending j
        dists.sort_by(|a, b| a.0.total_cmp(&b.0));

        for &(_, j) in dists.iter().take(k_eff) {
            w.link(i, j);
        }
    }

    Ok(w)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_points() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (5.0, 5.0), (5.0, 6.0)]
    }

    #[test]
    fn test_each_row_has_k_links() {
        let w = knn_weights(&five_points(), 2).unwrap();
        for i in 0..5 {
            assert_eq!(w.degree(i), 2, "row {}", i);
            assert_eq!(w.get(i, i), 0);
        }
    }

    #[test]
    fn test_tie_break_prefers_lower_index() {
        // (5,5) is sqrt(41) from both (1,0) and (0,1); index 1 wins
        let w = knn_weights(&five_points(), 2).unwrap();
        assert_eq!(w.neighbors(3).collect::<Vec<_>>(), vec![1, 4]);
        assert_eq!(w.neighbors(4).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(w.neighbors(0).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_asymmetric() {
        let w = knn_weights(&five_points(), 1).unwrap();
        // 0 and 1 pick each other; 2 -> 0 is one-way
        assert!(w.has_link(2, 0));
        assert!(!w.has_link(0, 2));
        assert!(!w.is_symmetric());
    }

    #[test]
    fn test_clamp_k() {
        let w = knn_weights(&five_points(), 10).unwrap();
        for i in 0..5 {
            assert_eq!(w.degree(i), 4);
        }
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(knn_weights(&five_points(), 0).is_err());
        let err = knn_weights(&[(0.0, 0.0)], 1).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_deterministic() {
        let pts: Vec<(f64, f64)> = (0..30)
            .map(|i| ((i % 6) as f64, (i / 6) as f64))
            .collect();
        let a = knn_weights(&pts, 4).unwrap();
        let b = knn_weights(&pts, 4).unwrap();
        assert_eq!(a, b);
    }
}
