//! Dissolve: merge features sharing an attribute value.
//!
//! Geometries of each group are unioned with `geo::BooleanOps`; numeric
//! columns are aggregated per group (sum, mean, min, max, count, first).

use geo::{BooleanOps, MultiPolygon};
use std::collections::HashMap;
use surtclass_core::{AttributeValue, Error, Feature, FeatureCollection, Result};
use tracing::debug;

use super::overlay::{as_multipolygon, into_geometry};

/// How a column is reduced within each dissolved group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Sum,
    Mean,
    Min,
    Max,
    /// Number of features in the group (the column's values are ignored)
    Count,
    /// Value of the first feature in the group, of any type
    First,
}

/// Dissolve `features` by attribute `by`.
///
/// Output features appear in order of first occurrence of each key and
/// carry the `by` attribute plus one attribute per entry of `aggregations`,
/// named after its source column.
///
/// # Errors
/// [`Error::InvalidInput`] if a feature lacks the `by` attribute, or if a
/// numeric aggregation meets a missing or non-numeric value.
pub fn dissolve(
    features: &FeatureCollection,
    by: &str,
    aggregations: &[(&str, Aggregation)],
) -> Result<FeatureCollection> {
    let mut order: Vec<&AttributeValue> = Vec::new();
    let mut groups: HashMap<String, Vec<&Feature>> = HashMap::new();

    for (i, feature) in features.iter().enumerate() {
        let key = feature.get_property(by).ok_or_else(|| {
            Error::InvalidInput(format!("feature {}: dissolve attribute '{}' is missing", i, by))
        })?;
        let members = groups.entry(key.as_key()).or_default();
        if members.is_empty() {
            order.push(key);
        }
        members.push(feature);
    }

    let mut out = FeatureCollection::new();
    for key in order {
        let members = &groups[&key.as_key()];

        let mut feature = match union_all(members.iter().copied()) {
            Some(mp) if !mp.0.is_empty() => Feature::new(into_geometry(mp)),
            _ => Feature::empty(),
        };
        feature.set_property(by, key.clone());

        for &(column, agg) in aggregations {
            feature.set_property(column, aggregate(members, column, agg)?);
        }
        out.push(feature);
    }

    debug!("dissolve by '{}': {} features -> {} groups", by, features.len(), out.len());
    Ok(out)
}

fn aggregate(members: &[&Feature], column: &str, agg: Aggregation) -> Result<AttributeValue> {
    let value = match agg {
        Aggregation::Count => AttributeValue::Int(members.len() as i64),
        Aggregation::First => members[0]
            .get_property(column)
            .cloned()
            .unwrap_or(AttributeValue::Null),
        Aggregation::Sum => numeric(members, column, |v| v.iter().sum())?,
        Aggregation::Mean => {
            let values = numeric_values(members, column)?;
            AttributeValue::Float(values.iter().sum::<f64>() / values.len() as f64)
        }
        Aggregation::Min => numeric(members, column, |v| {
            v.iter().copied().fold(f64::INFINITY, f64::min)
        })?,
        Aggregation::Max => numeric(members, column, |v| {
            v.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        })?,
    };
    Ok(value)
}

/// Reduce a numeric column. Integer columns stay integers.
fn numeric(
    members: &[&Feature],
    column: &str,
    reduce: impl Fn(&[f64]) -> f64,
) -> Result<AttributeValue> {
    let values = numeric_values(members, column)?;
    let result = reduce(&values);
    let all_int = members
        .iter()
        .all(|f| matches!(f.get_property(column), Some(AttributeValue::Int(_))));
    Ok(if all_int {
        AttributeValue::Int(result as i64)
    } else {
        AttributeValue::Float(result)
    })
}

fn numeric_values(members: &[&Feature], column: &str) -> Result<Vec<f64>> {
    members
        .iter()
        .map(|f| {
            f.get_property(column).and_then(AttributeValue::as_f64).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "cannot aggregate '{}': missing or non-numeric value",
                    column
                ))
            })
        })
        .collect()
}

/// Union of all polygonal geometries among `features`.
///
/// Non-polygonal and missing geometries are skipped; `None` if nothing
/// polygonal is left.
pub fn union_all<'a>(features: impl IntoIterator<Item = &'a Feature>) -> Option<MultiPolygon<f64>> {
    features
        .into_iter()
        .filter_map(|f| f.geometry.as_ref().and_then(as_multipolygon))
        .reduce(|acc, mp| acc.union(&mp))
}
