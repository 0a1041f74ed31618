//! Vector features: geometry plus an attribute table row.
//!
//! Classification works on attribute columns; these types are where the
//! columns come from and where the resulting labels are attached back.

use geo_types::Geometry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    /// Numeric view of the value. Only `Int` and `Float` are numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Int(v) => Some(*v as f64),
            AttributeValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Grouping key for dissolve. The key is tagged with the variant, so
    /// `Int(1)` and `String("1")` (or `Null` and `String("")`) never collide.
    pub fn as_key(&self) -> String {
        match self {
            AttributeValue::Null => "null".to_string(),
            AttributeValue::Bool(b) => format!("b:{}", b),
            AttributeValue::Int(v) => format!("i:{}", v),
            AttributeValue::Float(v) => format!("f:{}", v),
            AttributeValue::String(s) => format!("s:{}", s),
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::String(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::String(v)
    }
}

/// A geographic feature with geometry and attributes
#[derive(Debug, Clone)]
pub struct Feature {
    /// Feature geometry
    pub geometry: Option<Geometry<f64>>,
    /// Feature attributes
    pub properties: HashMap<String, AttributeValue>,
    /// Optional feature ID
    pub id: Option<String>,
}

impl Feature {
    /// Create a new feature with geometry
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            geometry: Some(geometry),
            properties: HashMap::new(),
            id: None,
        }
    }

    /// Create a feature with no geometry
    pub fn empty() -> Self {
        Self {
            geometry: None,
            properties: HashMap::new(),
            id: None,
        }
    }

    /// Builder-style attribute setter
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.set_property(key, value.into());
        self
    }

    /// Set an attribute
    pub fn set_property(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.properties.insert(key.into(), value);
    }

    /// Get an attribute
    pub fn get_property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }
}

/// Collection of features
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self { features: Vec::new() }
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

    /// Extract a numeric attribute column in feature order.
    ///
    /// Fails with [`Error::InvalidInput`] on the first feature whose value is
    /// missing or not numeric.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        self.features
            .iter()
            .enumerate()
            .map(|(i, f)| match f.get_property(name) {
                Some(value) => value.as_f64().ok_or_else(|| {
                    Error::InvalidInput(format!(
                        "feature {}: attribute '{}' is not numeric ({:?})",
                        i, name, value
                    ))
                }),
                None => Err(Error::InvalidInput(format!(
                    "feature {}: attribute '{}' is missing",
                    i, name
                ))),
            })
            .collect()
    }

    /// Attach one value per feature as attribute `name`.
    pub fn set_column<V>(&mut self, name: &str, values: impl IntoIterator<Item = V>) -> Result<()>
    where
        V: Into<AttributeValue>,
    {
        let values: Vec<AttributeValue> = values.into_iter().map(Into::into).collect();
        if values.len() != self.features.len() {
            return Err(Error::InvalidInput(format!(
                "column '{}' has {} values for {} features",
                name,
                values.len(),
                self.features.len()
            )));
        }
        for (feature, value) in self.features.iter_mut().zip(values) {
            feature.set_property(name, value);
        }
        Ok(())
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}
