//! Vector geometry operations on region boundaries
//!
//! - Repair: make source polygons valid before topological tests
//! - Adjacency: touch test and shared-boundary classification (edge / vertex)

mod adjacency;
mod repair;

pub use adjacency::{
    adjacency_kind, bboxes_may_touch, evaluate_pair, touches, AdjacencyKind, PreparedGeometry,
    DEFAULT_BBOX_MARGIN,
};
pub use repair::repair_multi_polygon;
