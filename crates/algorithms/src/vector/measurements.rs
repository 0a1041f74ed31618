//! Geometric measurements

use geo::{Area as GeoArea, Geometry};
use surtclass_core::FeatureCollection;

/// Unsigned planar area of a geometry, in CRS units squared.
///
/// Non-areal geometries measure 0. For a geographic CRS the result is in
/// square degrees; project to a metric CRS first for square meters.
pub fn area(geom: &Geometry<f64>) -> f64 {
    match geom {
        Geometry::Polygon(_)
        | Geometry::MultiPolygon(_)
        | Geometry::Rect(_)
        | Geometry::Triangle(_)
        | Geometry::GeometryCollection(_) => geom.unsigned_area(),
        _ => 0.0,
    }
}

/// Area of every feature, in feature order (0 for features without geometry).
pub fn feature_areas(features: &FeatureCollection) -> Vec<f64> {
    features
        .iter()
        .map(|f| f.geometry.as_ref().map_or(0.0, area))
        .collect()
}
