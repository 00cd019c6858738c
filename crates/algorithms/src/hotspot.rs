//! Hotspot analysis over a set of regions
//!
//! `analyze` aligns regions to one code-sorted index space, builds the
//! weight matrix, runs the chosen local statistic and assembles one record
//! per region. Statistic fields are rounded to 4 decimals on assembly.

use hotspot_core::{align_regions, Region, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::statistics::{
    getis_ord_gi_star, global_morans_i, local_morans_i, GetisOrdParams, GiClass,
    LocalMoranParams, MoranClass, MoransIResult, Quadrant,
};
use crate::weights::WeightStrategy;

/// Local statistic to compute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatisticKind {
    /// Getis-Ord Gi*
    #[default]
    #[serde(rename = "gistar")]
    GetisOrd,
    /// Local Moran's I
    #[serde(rename = "moran")]
    LocalMoran,
}

impl StatisticKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetisOrd => "gistar",
            Self::LocalMoran => "moran",
        }
    }
}

impl fmt::Display for StatisticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything that parameterizes one analysis
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub strategy: WeightStrategy,
    pub statistic: StatisticKind,
    pub getis_ord: GetisOrdParams,
    pub local_moran: LocalMoranParams,
    /// Seed for the permutation test; entropy when `None`
    pub seed: Option<u64>,
}

impl AnalysisRequest {
    pub fn new(strategy: WeightStrategy, statistic: StatisticKind) -> Self {
        Self {
            strategy,
            statistic,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Gi* fields of a region record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GetisOrdRecord {
    pub z: f64,
    pub p: f64,
    #[serde(rename = "cls")]
    pub class: GiClass,
}

/// Local Moran fields of a region record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalMoranRecord {
    #[serde(rename = "I")]
    pub i: f64,
    pub z: f64,
    pub lag: f64,
    #[serde(rename = "quad")]
    pub quadrant: Quadrant,
    pub p: f64,
    #[serde(rename = "cls")]
    pub class: MoranClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegionStatistic {
    LocalMoran(LocalMoranRecord),
    GetisOrd(GetisOrdRecord),
}

impl RegionStatistic {
    /// Two-sided (or pseudo) p-value
    pub fn p(&self) -> f64 {
        match self {
            Self::LocalMoran(r) => r.p,
            Self::GetisOrd(r) => r.p,
        }
    }

    /// Classification label
    pub fn class_label(&self) -> &'static str {
        match self {
            Self::LocalMoran(r) => r.class.as_str(),
            Self::GetisOrd(r) => r.class.as_str(),
        }
    }

    pub fn is_significant(&self) -> bool {
        self.class_label() != "ns"
    }
}

/// Output record for one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionResult {
    #[serde(rename = "adm_cd")]
    pub code: String,
    #[serde(rename = "adm_nm")]
    pub name: String,
    pub value: f64,
    #[serde(flatten)]
    pub statistic: RegionStatistic,
}

/// Summary of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    #[serde(rename = "n")]
    pub region_count: usize,
    pub strategy: WeightStrategy,
    #[serde(rename = "stat_type")]
    pub statistic: StatisticKind,
    pub isolated_count: usize,
    pub mean_neighbors: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub global_moran: Option<MoransIResult>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub permutations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub seed: Option<u64>,
}

/// Per-region records in code order plus metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "result")]
    pub regions: Vec<RegionResult>,
    #[serde(flatten)]
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Records whose class is not "ns"
    pub fn significant(&self) -> impl Iterator<Item = &RegionResult> {
        self.regions.iter().filter(|r| r.statistic.is_significant())
    }

    /// Number of regions per class label, in first-seen order
    pub fn class_counts(&self) -> Vec<(&'static str, usize)> {
        let mut counts: Vec<(&'static str, usize)> = Vec::new();
        for r in &self.regions {
            let label = r.statistic.class_label();
            match counts.iter_mut().find(|(l, _)| *l == label) {
                Some((_, c)) => *c += 1,
                None => counts.push((label, 1)),
            }
        }
        counts
    }
}

/// Run a hotspot analysis.
///
/// Seeds the permutation test from `request.seed`, or from entropy when it
/// is unset.
pub fn analyze(regions: Vec<Region>, request: &AnalysisRequest) -> Result<AnalysisResult> {
    let mut rng = match request.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    analyze_with_rng(regions, request, &mut rng)
}

/// Run a hotspot analysis with a caller-provided random source.
///
/// # Errors
/// Precondition errors for duplicate codes, non-finite values or
/// coordinates, and too few regions for the strategy.
pub fn analyze_with_rng<R: Rng + ?Sized>(
    regions: Vec<Region>,
    request: &AnalysisRequest,
    rng: &mut R,
) -> Result<AnalysisResult> {
    let regions = align_regions(regions)?;
    for region in &regions {
        region.validate()?;
    }
    request.strategy.check_region_count(regions.len())?;

    info!(
        "Analyzing {} regions: {} with {}",
        regions.len(),
        request.statistic,
        request.strategy
    );

    let weights = request.strategy.build(&regions)?;
    let isolated_count = weights.isolated_count();
    let mean_neighbors = weights.mean_degree();
    debug!(
        "weights: {} links, mean degree {:.2}, symmetric: {}",
        weights.link_count(),
        mean_neighbors,
        weights.is_symmetric()
    );
    if isolated_count > 0 {
        warn!("{} region(s) have no neighbors", isolated_count);
    }

    let values: Vec<f64> = regions.iter().map(|r| r.value).collect();

    let statistics: Vec<RegionStatistic> = match request.statistic {
        StatisticKind::GetisOrd => getis_ord_gi_star(&values, &weights, &request.getis_ord)?
            .into_iter()
            .map(|s| {
                RegionStatistic::GetisOrd(GetisOrdRecord {
                    z: round4(s.z),
                    p: round4(s.p),
                    class: s.class,
                })
            })
            .collect(),
        StatisticKind::LocalMoran => local_morans_i(&values, &weights, &request.local_moran, rng)?
            .into_iter()
            .map(|s| {
                RegionStatistic::LocalMoran(LocalMoranRecord {
                    i: round4(s.i),
                    z: round4(s.z),
                    lag: round4(s.lag),
                    quadrant: s.quadrant,
                    p: round4(s.p),
                    class: s.class,
                })
            })
            .collect(),
    };

    let global_moran = match global_morans_i(&values, &weights) {
        Ok(g) => Some(g),
        Err(e) => {
            debug!("global Moran's I skipped: {}", e);
            None
        }
    };

    let metadata = AnalysisMetadata {
        region_count: regions.len(),
        strategy: request.strategy,
        statistic: request.statistic,
        isolated_count,
        mean_neighbors: round4(mean_neighbors),
        global_moran,
        permutations: (request.statistic == StatisticKind::LocalMoran)
            .then_some(request.local_moran.permutations),
        seed: request.seed,
    };

    let regions = regions
        .into_iter()
        .zip(statistics)
        .map(|(r, statistic)| RegionResult {
            code: r.code,
            name: r.name,
            value: r.value,
            statistic,
        })
        .collect();

    Ok(AnalysisResult { regions, metadata })
}

// Adding 0.0 turns -0.0 into 0.0
fn round4(v: f64) -> f64 {
    (v * 1e4).round() / 1e4 + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::ContiguityKind;
    use geo::{LineString, MultiPolygon, Polygon};

    fn five_regions() -> Vec<Region> {
        vec![
            Region::new("11010", "a", 10.0, 0.0, 0.0),
            Region::new("11020", "b", 12.0, 1.0, 0.0),
            Region::new("11030", "c", 11.0, 0.0, 1.0),
            Region::new("11040", "d", 100.0, 5.0, 5.0),
            Region::new("11050", "e", 98.0, 5.0, 6.0),
        ]
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(1.234_56), 1.2346);
        assert!(round4(-0.000_04).is_sign_positive());
        assert_eq!(serde_json::to_string(&round4(-0.000_04)).unwrap(), "0.0");
        assert_eq!(round4(-0.000_06), -0.0001);
        assert_eq!(round4(2.0), 2.0);
    }

    #[test]
    fn test_output_sorted_by_code() {
        let mut regions = five_regions();
        regions.reverse();
        let request = AnalysisRequest::new(WeightStrategy::Knn { k: 2 }, StatisticKind::GetisOrd);
        let result = analyze(regions, &request).unwrap();
        let codes: Vec<_> = result.regions.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["11010", "11020", "11030", "11040", "11050"]);
        assert_eq!(result.metadata.region_count, 5);
        assert_eq!(result.metadata.isolated_count, 0);
        assert!(result.metadata.permutations.is_none());
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let mut regions = five_regions();
        regions.push(Region::new("11010", "dup", 1.0, 9.0, 9.0));
        let request = AnalysisRequest::new(WeightStrategy::Knn { k: 2 }, StatisticKind::GetisOrd);
        assert!(analyze(regions, &request).unwrap_err().is_precondition());
    }

    #[test]
    fn test_too_few_regions_for_k() {
        let request = AnalysisRequest::new(WeightStrategy::Knn { k: 5 }, StatisticKind::GetisOrd);
        assert!(analyze(five_regions(), &request).unwrap_err().is_precondition());
    }

    #[test]
    fn test_huge_k_is_a_precondition_error() {
        let request = AnalysisRequest::new(
            WeightStrategy::Knn { k: usize::MAX },
            StatisticKind::GetisOrd,
        );
        let err = analyze(five_regions()[..3].to_vec(), &request).unwrap_err();
        assert!(matches!(err, hotspot_core::Error::InsufficientRegions { .. }));
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let mut regions = five_regions();
        regions[2].value = f64::NAN;
        let request = AnalysisRequest::default();
        assert!(analyze(regions, &request).unwrap_err().is_precondition());
    }

    #[test]
    fn test_moran_json_keys() {
        let request = AnalysisRequest::new(WeightStrategy::Knn { k: 2 }, StatisticKind::LocalMoran)
            .with_seed(5);
        let result = analyze(five_regions(), &request).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        let first = &json["result"][0];
        for key in ["adm_cd", "adm_nm", "value", "I", "z", "lag", "quad", "p", "cls"] {
            assert!(first.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["stat_type"], "moran");
        assert_eq!(json["n"], 5);
        assert_eq!(json["permutations"], 199);
        assert_eq!(json["strategy"]["type"], "knn");
    }

    #[test]
    fn test_contiguity_analysis() {
        // 4x4 grid of unit squares, hot 2x2 block in one corner
        let mut regions = Vec::new();
        for row in 0..4 {
            for col in 0..4 {
                let (x, y) = (col as f64, row as f64);
                let square = Polygon::new(
                    LineString::from(vec![
                        (x, y),
                        (x + 1.0, y),
                        (x + 1.0, y + 1.0),
                        (x, y + 1.0),
                        (x, y),
                    ]),
                    vec![],
                );
                let value = if row < 2 && col < 2 { 50.0 } else { 1.0 + (row + col) as f64 * 0.1 };
                regions.push(
                    Region::new(format!("{}{}", row, col), "cell", value, x + 0.5, y + 0.5)
                        .with_geometry(MultiPolygon::new(vec![square])),
                );
            }
        }
        let request = AnalysisRequest::new(
            WeightStrategy::Contiguity { kind: ContiguityKind::Queen },
            StatisticKind::GetisOrd,
        );
        let result = analyze(regions, &request).unwrap();
        assert_eq!(result.metadata.isolated_count, 0);
        let corner = result.regions.iter().find(|r| r.code == "00").unwrap();
        match corner.statistic {
            RegionStatistic::GetisOrd(g) => assert!(g.z > 0.0),
            _ => panic!("expected Gi* record"),
        }
    }
}
