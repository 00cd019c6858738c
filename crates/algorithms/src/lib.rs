//! # Hotspot Algorithms
//!
//! Spatial autocorrelation analysis over administrative regions.
//!
//! ## Available Algorithm Categories
//!
//! - **vector**: Geometry repair and boundary adjacency (edge / vertex)
//! - **weights**: knn, distance band and contiguity weight matrices
//! - **statistics**: Getis-Ord Gi*, Local and Global Moran's I
//! - **hotspot**: End-to-end analysis producing per-region records

pub mod hotspot;
pub mod statistics;
pub mod vector;
pub mod weights;

pub use hotspot::{analyze, analyze_with_rng, AnalysisRequest, AnalysisResult, StatisticKind};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::hotspot::{
        analyze, analyze_with_rng, AnalysisMetadata, AnalysisRequest, AnalysisResult,
        RegionResult, RegionStatistic, StatisticKind,
    };
    pub use crate::statistics::{
        getis_ord_gi_star, global_morans_i, local_morans_i, GetisOrdParams, GiClass,
        LocalMoranParams, MoranClass, Quadrant,
    };
    pub use crate::vector::{adjacency_kind, touches, AdjacencyKind};
    pub use crate::weights::{
        contiguity_weights, distance_weights, knn_weights, ContiguityKind, WeightMatrix,
        WeightStrategy,
    };
    pub use hotspot_core::prelude::*;
}
