//! Vector data structures
//!
//! A minimal GeoJSON model: features whose geometry is a typed
//! [`CoordinateTree`] and whose properties are kept as raw JSON, so that
//! boundary files can be read, reprojected and written back without losing
//! attributes.

mod bbox;
mod geometry;

pub use bbox::BoundingBox;
pub use geometry::{CoordinateTree, MapPositions, Position};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn feature_type() -> String {
    "Feature".to_string()
}

fn collection_type() -> String {
    "FeatureCollection".to_string()
}

/// A geographic feature with geometry and attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    /// Feature geometry
    pub geometry: Option<CoordinateTree>,
    /// Feature attributes
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    /// Optional feature ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl Feature {
    /// Create a new feature with geometry
    pub fn new(geometry: CoordinateTree) -> Self {
        Self {
            kind: feature_type(),
            geometry: Some(geometry),
            properties: Some(Map::new()),
            id: None,
        }
    }

    /// Set an attribute
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
    }

    /// Get an attribute
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref()?.get(key)
    }

    /// Attribute as text; numbers are formatted, null and missing are `None`.
    pub fn property_str(&self, key: &str) -> Option<String> {
        match self.get_property(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Attribute as a number; numeric strings are parsed.
    pub fn property_f64(&self, key: &str) -> Option<f64> {
        value_as_f64(self.get_property(key)?)
    }
}

/// Interpret a JSON value as a number, accepting numeric strings.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Collection of features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_type")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<Feature>,
    /// Foreign members (service status codes and the like)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self {
            kind: collection_type(),
            features: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Apply a position transform to every feature geometry.
    pub fn map_positions<F: Fn(Position) -> Position>(&mut self, f: &F) {
        for feature in &mut self.features {
            feature.geometry = feature.geometry.as_ref().map(|g| g.map_positions(f));
        }
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}
