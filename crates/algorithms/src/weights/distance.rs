//! Fixed-distance threshold weights

use hotspot_core::{Error, Result};

use super::WeightMatrix;

/// Binary weights linking every pair of regions within `radius`.
///
/// `radius` is in the coordinate unit (metres). Regions with no other
/// region in range get an empty row; that is reported as isolation, not
/// as an error. The result is symmetric.
pub fn distance_weights(coords: &[(f64, f64)], radius: f64) -> Result<WeightMatrix> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(Error::InvalidParameter {
            name: "radius",
            value: radius.to_string(),
            reason: "must be a finite non-negative distance".into(),
        });
    }
    let n = coords.len();
    if n < 2 {
        return Err(Error::InsufficientRegions {
            strategy: format!("distance (r={})", radius),
            needed: 2,
            found: n,
        });
    }

    let r2 = radius * radius;
    let mut w = WeightMatrix::zeros(n);

    for i in 0..n {
        let (xi, yi) = coords[i];
        for j in (i + 1)..n {
            let dx = xi - coords[j].0;
            let dy = yi - coords[j].1;
            if dx * dx + dy * dy <= r2 {
                w.link_both(i, j);
            }
        }
    }

    Ok(w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_inclusive() {
        let coords = vec![(0.0, 0.0), (3.0, 4.0), (10.0, 0.0)];
        let w = distance_weights(&coords, 5.0).unwrap();
        assert!(w.has_link(0, 1));
        assert!(w.has_link(1, 0));
        assert!(!w.has_link(0, 2));
        assert!(w.is_symmetric());
        assert!(w.is_isolated(2));
        assert_eq!(w.isolated_count(), 1);
    }

    #[test]
    fn test_zero_radius_isolates_everything() {
        let coords = vec![(0.0, 0.0), (1.0, 0.0)];
        let w = distance_weights(&coords, 0.0).unwrap();
        assert_eq!(w.isolated_count(), 2);
    }

    #[test]
    fn test_coincident_points_link_at_zero_radius() {
        let coords = vec![(2.0, 2.0), (2.0, 2.0)];
        let w = distance_weights(&coords, 0.0).unwrap();
        assert!(w.has_link(0, 1));
        assert_eq!(w.get(0, 0), 0);
    }

    #[test]
    fn test_invalid_radius() {
        let coords = vec![(0.0, 0.0), (1.0, 0.0)];
        assert!(distance_weights(&coords, -1.0).is_err());
        assert!(distance_weights(&coords, f64::NAN).is_err());
        assert!(distance_weights(&coords[..1], 1.0).is_err());
    }
}
