//! Vector operations feeding the classifier
//!
//! Thin layers over `geo` for the usual preparation steps:
//! - Overlay: intersect two polygon layers
//! - Dissolve: merge features by attribute, aggregating columns
//! - Simplify: line generalization (Douglas-Peucker, Visvalingam-Whyatt)
//! - Area: planar measurement
//! - Attribute classification: label a column and attach it back

mod attributes;
mod dissolve;
mod measurements;
mod overlay;
mod simplify;

pub use attributes::{classify_column, custom_classify_column, fit_classify_column};
pub use dissolve::{dissolve, union_all, Aggregation};
pub use measurements::{area, feature_areas};
pub use overlay::overlay_intersection;
pub use simplify::{simplify, simplify_features, SimplifyMethod, SimplifyParams};
