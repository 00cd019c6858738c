//! Polygon repair before topological tests
//!
//! Boundary data from statistics services regularly carries repeated
//! vertices, clockwise shells and small self-intersections. Repair runs in
//! three steps, stopping at the first valid result:
//! 1. drop consecutive duplicate vertices and normalise ring orientation
//! 2. self-union of the parts, which splits self-intersecting rings and
//!    merges overlapping parts
//! 3. give up: the polygon is reported as unrepairable

use std::panic::{catch_unwind, AssertUnwindSafe};

use geo::orient::{Direction, Orient};
use geo::{BooleanOps, MultiPolygon, RemoveRepeatedPoints, Validation};
use tracing::debug;

/// Return a valid version of `geom`, or `None` when it cannot be repaired.
pub fn repair_multi_polygon(geom: &MultiPolygon<f64>) -> Option<MultiPolygon<f64>> {
    if geom.0.is_empty() {
        return None;
    }

    let cleaned = geom.remove_repeated_points().orient(Direction::Default);
    if cleaned.is_valid() {
        return Some(cleaned);
    }

    // The overlay can panic on degenerate input
    let healed = catch_unwind(AssertUnwindSafe(|| self_union(&cleaned))).ok()?;
    if healed.0.is_empty() {
        debug!("repair: self-union produced an empty geometry");
        return None;
    }
    if !healed.is_valid() {
        debug!("repair: geometry still invalid after self-union");
        return None;
    }
    Some(healed)
}

fn self_union(geom: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    geom.0.iter().fold(MultiPolygon::new(Vec::new()), |acc, part| {
        acc.union(&MultiPolygon::new(vec![part.clone()]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, LineString, Polygon};

    fn ring(coords: &[(f64, f64)]) -> LineString<f64> {
        LineString::from(coords.to_vec())
    }

    #[test]
    fn test_valid_polygon_unchanged_in_area() {
        let sq = Polygon::new(
            ring(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (0.0, 0.0)]),
            vec![],
        );
        let fixed = repair_multi_polygon(&MultiPolygon::new(vec![sq])).unwrap();
        assert!((fixed.unsigned_area() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_clockwise_and_repeated_vertices() {
        let cw = Polygon::new(
            ring(&[
                (0.0, 0.0),
                (0.0, 2.0),
                (0.0, 2.0),
                (2.0, 2.0),
                (2.0, 0.0),
                (0.0, 0.0),
            ]),
            vec![],
        );
        let fixed = repair_multi_polygon(&MultiPolygon::new(vec![cw])).unwrap();
        assert!(fixed.is_valid());
        assert_eq!(fixed.0[0].exterior().0.len(), 5);
        assert!((fixed.unsigned_area() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_overlapping_parts_repair_to_valid() {
        let a = Polygon::new(
            ring(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (0.0, 0.0)]),
            vec![],
        );
        let b = Polygon::new(
            ring(&[(1.0, 0.0), (3.0, 0.0), (3.0, 2.0), (1.0, 2.0), (1.0, 0.0)]),
            vec![],
        );
        let input = MultiPolygon::new(vec![a, b]);
        assert!(!input.is_valid());
        let fixed = repair_multi_polygon(&input).unwrap();
        assert!(fixed.is_valid());
        assert!(fixed.unsigned_area() >= 6.0 - 1e-9);
    }

    #[test]
    fn test_validation_reports_ring_problems() {
        let open_ring = Polygon::new(ring(&[(0.0, 0.0), (1.0, 0.0)]), vec![]);
        let mp = MultiPolygon::new(vec![open_ring]);
        assert!(!mp.is_valid());
        assert!(repair_multi_polygon(&mp).map_or(true, |fixed| fixed.is_valid()));
    }

    #[test]
    fn test_empty_is_unrepairable() {
        assert!(repair_multi_polygon(&MultiPolygon::new(vec![])).is_none());
    }

    #[test]
    fn test_bowtie_never_panics() {
        let bowtie = Polygon::new(
            ring(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0), (0.0, 0.0)]),
            vec![],
        );
        if let Some(fixed) = repair_multi_polygon(&MultiPolygon::new(vec![bowtie])) {
            assert!(fixed.is_valid());
        }
    }
}
