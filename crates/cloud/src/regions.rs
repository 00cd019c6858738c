//! Assembly of fetched partitions into analysis regions.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use hotspot_core::{Feature, Region};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CloudError, Result};
use crate::models::PopulationItem;
use crate::sgis::Partition;

/// Municipality (시군구) codes have five digits.
pub const MUNICIPALITY_CODE_LEN: usize = 5;

/// Which statistic becomes the region value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variable {
    /// Total population
    #[default]
    Population,
    /// Population density
    Density,
}

impl Variable {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Population => "population",
            Self::Density => "density",
        }
    }

    /// Value of this variable in a statistics row
    pub fn value_of(&self, item: &PopulationItem) -> f64 {
        match self {
            Self::Population => item.population(),
            Self::Density => item.density(),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variable {
    type Err = CloudError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "population" | "pop" => Ok(Self::Population),
            "density" => Ok(Self::Density),
            other => Err(CloudError::Parse(format!("unknown variable '{}'", other))),
        }
    }
}

/// Location and boundary of one municipality
struct Site {
    name: String,
    x: f64,
    y: f64,
    feature: Feature,
}

/// Join statistics and boundaries of all partitions into regions.
///
/// Only municipality codes present in both sources are kept. Boundaries
/// without a representative point are dropped. Output is sorted by code.
pub fn assemble_regions(partitions: &[Partition], variable: Variable) -> Vec<Region> {
    let mut values: BTreeMap<String, (String, f64)> = BTreeMap::new();
    let mut sites: BTreeMap<String, Site> = BTreeMap::new();

    for partition in partitions {
        for item in &partition.population {
            if item.adm_cd.len() == MUNICIPALITY_CODE_LEN {
                values.insert(item.adm_cd.clone(), (item.adm_nm.clone(), variable.value_of(item)));
            }
        }
        for feature in partition.boundary.iter() {
            let Some(code) = feature.property_str("adm_cd") else { continue };
            if code.len() != MUNICIPALITY_CODE_LEN {
                continue;
            }
            let (Some(x), Some(y)) = (feature.property_f64("x"), feature.property_f64("y")) else {
                warn!("boundary {} has no representative point, skipped", code);
                continue;
            };
            let name = feature.property_str("adm_nm").unwrap_or_default();
            sites.insert(
                code,
                Site {
                    name,
                    x,
                    y,
                    feature: feature.clone(),
                },
            );
        }
    }

    let regions: Vec<Region> = values
        .into_iter()
        .filter_map(|(code, (stat_name, value))| {
            let site = sites.remove(&code)?;
            let name = if site.name.is_empty() { stat_name } else { site.name };
            let mut region = Region::new(code, name, value, site.x, site.y);
            region.geometry = site
                .feature
                .geometry
                .as_ref()
                .and_then(|g| g.to_multi_polygon());
            Some(region)
        })
        .collect();

    debug!(
        "assembled {} regions ({} boundaries without statistics)",
        regions.len(),
        sites.len()
    );
    regions
}
