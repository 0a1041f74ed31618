//! Classifying attribute columns of a feature layer.
//!
//! Extracts a numeric column, labels it, and writes the labels back as a
//! new column so the layer can be symbolized or exported.

use surtclass_core::{FeatureCollection, Result};
use tracing::debug;

use crate::classification::{classify_all, fit_classify, Classification, ClassifyParams, RuleTable, Scheme};

/// Label `column` with `scheme` and store the labels in `out_column`.
pub fn classify_column(
    features: &mut FeatureCollection,
    column: &str,
    scheme: &Scheme,
    out_column: &str,
) -> Result<Classification> {
    let values = features.numeric_column(column)?;
    let classification = classify_all(&values, scheme)?;
    features.set_column(out_column, classification.labels())?;
    Ok(classification)
}

/// Fit a scheme to `column`, then label it into `out_column`.
pub fn fit_classify_column(
    features: &mut FeatureCollection,
    column: &str,
    params: ClassifyParams,
    out_column: &str,
) -> Result<Classification> {
    let values = features.numeric_column(column)?;
    let classification = fit_classify(&values, params)?;
    debug!(
        "classified '{}' with {}: breaks {:?}, counts {:?}",
        column,
        classification.scheme().method().name(),
        classification.scheme().breaks(),
        classification.counts()
    );
    features.set_column(out_column, classification.labels())?;
    Ok(classification)
}

/// Label `column` with an ordered rule table into `out_column`.
///
/// Nothing is written unless every value is classified.
pub fn custom_classify_column(
    features: &mut FeatureCollection,
    column: &str,
    table: &RuleTable,
    out_column: &str,
) -> Result<()> {
    let labels: Vec<String> = features
        .numeric_column(column)?
        .into_iter()
        .map(|v| table.evaluate(v).map(str::to_string))
        .collect::<Result<_>>()?;
    features.set_column(out_column, labels)
}
