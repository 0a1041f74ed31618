//! # SurtClass Core
//!
//! Core types and errors for the SurtClass attribute classification library.
//!
//! This crate provides:
//! - `Error` / `Result`: the error contract shared by every crate
//! - `Feature`, `FeatureCollection`: geometry + attribute records
//! - Column extraction and label attachment for classification pipelines

pub mod error;
pub mod vector;

pub use error::{Error, Result};
pub use vector::{AttributeValue, Feature, FeatureCollection};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::vector::{AttributeValue, Feature, FeatureCollection};
}
