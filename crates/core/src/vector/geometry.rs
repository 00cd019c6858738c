//! GeoJSON geometry as a typed coordinate tree
//!
//! Each variant fixes its nesting depth in the type, so transforms recurse
//! over the structure instead of inspecting array depth at runtime.

use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};

/// A single `[x, y]` position
pub type Position = [f64; 2];

/// GeoJSON geometry object (`type` + `coordinates`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum CoordinateTree {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

/// Structures whose leaves are positions.
pub trait MapPositions: Sized {
    /// Apply `f` to every position, preserving the nesting.
    fn map_positions<F: Fn(Position) -> Position>(&self, f: &F) -> Self;
}

impl MapPositions for Position {
    fn map_positions<F: Fn(Position) -> Position>(&self, f: &F) -> Self {
        f(*self)
    }
}

impl<T: MapPositions> MapPositions for Vec<T> {
    fn map_positions<F: Fn(Position) -> Position>(&self, f: &F) -> Self {
        self.iter().map(|child| child.map_positions(f)).collect()
    }
}

impl MapPositions for CoordinateTree {
    fn map_positions<F: Fn(Position) -> Position>(&self, f: &F) -> Self {
        match self {
            Self::Point(p) => Self::Point(p.map_positions(f)),
            Self::MultiPoint(ps) => Self::MultiPoint(ps.map_positions(f)),
            Self::LineString(ps) => Self::LineString(ps.map_positions(f)),
            Self::MultiLineString(ls) => Self::MultiLineString(ls.map_positions(f)),
            Self::Polygon(rings) => Self::Polygon(rings.map_positions(f)),
            Self::MultiPolygon(polys) => Self::MultiPolygon(polys.map_positions(f)),
        }
    }
}

impl CoordinateTree {
    /// Geometry type name as it appears in GeoJSON
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Point(_) => "Point",
            Self::MultiPoint(_) => "MultiPoint",
            Self::LineString(_) => "LineString",
            Self::MultiLineString(_) => "MultiLineString",
            Self::Polygon(_) => "Polygon",
            Self::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Convert areal geometries to a `MultiPolygon`.
    ///
    /// Returns `None` for point/line geometries and for polygons without an
    /// exterior ring.
    pub fn to_multi_polygon(&self) -> Option<MultiPolygon<f64>> {
        let polygons: Vec<Polygon<f64>> = match self {
            Self::Polygon(rings) => rings_to_polygon(rings).into_iter().collect(),
            Self::MultiPolygon(polys) => polys.iter().filter_map(|r| rings_to_polygon(r)).collect(),
            _ => return None,
        };
        if polygons.is_empty() {
            None
        } else {
            Some(MultiPolygon::new(polygons))
        }
    }

    /// Build a `MultiPolygon` coordinate tree from geo types.
    pub fn from_multi_polygon(mp: &MultiPolygon<f64>) -> Self {
        let ring = |ls: &LineString<f64>| ls.0.iter().map(|c| [c.x, c.y]).collect::<Vec<_>>();
        Self::MultiPolygon(
            mp.0.iter()
                .map(|p| {
                    std::iter::once(ring(p.exterior()))
                        .chain(p.interiors().iter().map(ring))
                        .collect()
                })
                .collect(),
        )
    }
}

fn rings_to_polygon(rings: &[Vec<Position>]) -> Option<Polygon<f64>> {
    let (exterior, interiors) = rings.split_first()?;
    if exterior.is_empty() {
        return None;
    }
    let to_ls = |r: &Vec<Position>| {
        LineString::new(r.iter().map(|&[x, y]| Coord { x, y }).collect())
    };
    Some(Polygon::new(
        to_ls(exterior),
        interiors.iter().map(to_ls).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec<Position>> {
        vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]
    }

    #[test]
    fn test_deserialize_polygon() {
        let json = r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}"#;
        let tree: CoordinateTree = serde_json::from_str(json).unwrap();
        assert_eq!(tree, CoordinateTree::Polygon(square()));
        assert_eq!(tree.type_name(), "Polygon");
    }

    #[test]
    fn test_map_positions_preserves_nesting() {
        let tree = CoordinateTree::MultiPolygon(vec![square(), square()]);
        let shifted = tree.map_positions(&|[x, y]| [x + 10.0, y * 2.0]);
        match shifted {
            CoordinateTree::MultiPolygon(polys) => {
                assert_eq!(polys.len(), 2);
                assert_eq!(polys[1][0].len(), 5);
                assert_eq!(polys[1][0][2], [11.0, 2.0]);
            }
            other => panic!("unexpected variant {:?}", other),
        }
    }

    #[test]
    fn test_point_map() {
        let p = CoordinateTree::Point([3.0, 4.0]).map_positions(&|[x, y]| [y, x]);
        assert_eq!(p, CoordinateTree::Point([4.0, 3.0]));
    }

    #[test]
    fn test_to_multi_polygon() {
        let mp = CoordinateTree::Polygon(square()).to_multi_polygon().unwrap();
        assert_eq!(mp.0.len(), 1);
        assert_eq!(mp.0[0].exterior().0.len(), 5);

        assert!(CoordinateTree::Point([0.0, 0.0]).to_multi_polygon().is_none());
        assert!(CoordinateTree::Polygon(vec![]).to_multi_polygon().is_none());
    }

    #[test]
    fn test_multi_polygon_roundtrip_through_geo() {
        let tree = CoordinateTree::MultiPolygon(vec![square()]);
        let mp = tree.to_multi_polygon().unwrap();
        assert_eq!(CoordinateTree::from_multi_polygon(&mp), tree);
    }
}
