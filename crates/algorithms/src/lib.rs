//! # SurtClass Algorithms
//!
//! Attribute classification and vector preparation for SurtClass.
//!
//! ## Modules
//!
//! - **classification**: equal interval, quantiles, natural breaks,
//!   explicit break-points and ordered rule tables
//! - **vector**: overlay, dissolve, simplify, area and column labelling
//!   (geometry work is delegated to `geo`)

pub mod classification;
pub mod vector;

mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classification::{
        classify, classify_all, custom_classify, fit, fit_classify, Classification,
        ClassificationMethod, ClassifyParams, Rule, RuleTable, Scheme,
    };
    pub use crate::vector::{
        area, classify_column, custom_classify_column, dissolve, fit_classify_column,
        overlay_intersection, simplify, simplify_features, Aggregation, SimplifyMethod,
        SimplifyParams,
    };
    pub use surtclass_core::prelude::*;
}
