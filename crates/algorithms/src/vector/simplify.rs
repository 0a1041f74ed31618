//! Line generalization
//!
//! - Douglas-Peucker: drops vertices closer than `tolerance` to the chord
//! - Visvalingam-Whyatt: drops vertices whose effective area is below `tolerance`
//!
//! Both are `geo` implementations; this module applies them to every ring
//! and line of a feature layer.

use geo::{Geometry, LineString, MultiLineString, MultiPolygon, Polygon};
use geo::{Simplify, SimplifyVw};
use surtclass_core::{Error, FeatureCollection, Result};

/// Simplification algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimplifyMethod {
    #[default]
    DouglasPeucker,
    VisvalingamWhyatt,
}

/// Parameters for simplification
#[derive(Debug, Clone)]
pub struct SimplifyParams {
    /// Distance (DP) or area (VW) threshold, in CRS units
    pub tolerance: f64,
    pub method: SimplifyMethod,
}

impl Default for SimplifyParams {
    fn default() -> Self {
        Self {
            tolerance: 1.0,
            method: SimplifyMethod::DouglasPeucker,
        }
    }
}

/// Simplify a geometry. Points and collections are returned unchanged.
pub fn simplify(geom: &Geometry<f64>, params: &SimplifyParams) -> Geometry<f64> {
    let tol = params.tolerance;
    match params.method {
        SimplifyMethod::DouglasPeucker => map_lines(geom, &|ls| ls.simplify(&tol)),
        SimplifyMethod::VisvalingamWhyatt => map_lines(geom, &|ls| ls.simplify_vw(&tol)),
    }
}

/// Simplify every feature geometry in a layer, keeping attributes.
pub fn simplify_features(features: &FeatureCollection, params: &SimplifyParams) -> Result<FeatureCollection> {
    if !params.tolerance.is_finite() || params.tolerance < 0.0 {
        return Err(Error::InvalidParameter {
            name: "tolerance",
            value: params.tolerance.to_string(),
            reason: "must be a finite, non-negative number".into(),
        });
    }
    Ok(features
        .iter()
        .map(|f| {
            let mut out = f.clone();
            out.geometry = f.geometry.as_ref().map(|g| simplify(g, params));
            out
        })
        .collect())
}

fn map_lines(geom: &Geometry<f64>, f: &dyn Fn(&LineString<f64>) -> LineString<f64>) -> Geometry<f64> {
    match geom {
        Geometry::LineString(ls) => Geometry::LineString(f(ls)),
        Geometry::MultiLineString(mls) => {
            Geometry::MultiLineString(MultiLineString::new(mls.0.iter().map(f).collect()))
        }
        Geometry::Polygon(p) => Geometry::Polygon(map_rings(p, f)),
        Geometry::MultiPolygon(mp) => {
            Geometry::MultiPolygon(MultiPolygon::new(mp.0.iter().map(|p| map_rings(p, f)).collect()))
        }
        other => other.clone(),
    }
}

fn map_rings(polygon: &Polygon<f64>, f: &dyn Fn(&LineString<f64>) -> LineString<f64>) -> Polygon<f64> {
    let exterior = f(polygon.exterior());
    let interiors = polygon
        .interiors()
        .iter()
        .map(f)
        // Holes that collapse below a valid ring are dropped
        .filter(|ring| ring.0.len() >= 4)
        .collect();
    Polygon::new(exterior, interiors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;
    use surtclass_core::Feature;

    fn coastline() -> LineString<f64> {
        LineString::from(vec![
            (0.0, 0.0),
            (1.0, 0.1),
            (2.0, 0.0),
            (3.0, -0.05),
            (4.0, 0.0),
            (5.0, 0.2),
            (6.0, 0.0),
            (10.0, 0.0),
        ])
    }

    fn vertex_count(g: &Geometry<f64>) -> usize {
        match g {
            Geometry::LineString(ls) => ls.0.len(),
            Geometry::Polygon(p) => p.exterior().0.len(),
            _ => 0,
        }
    }

    #[test]
    fn test_douglas_peucker_keeps_endpoints() {
        let params = SimplifyParams { tolerance: 0.15, ..Default::default() };
        let out = simplify(&Geometry::LineString(coastline()), &params);
        let Geometry::LineString(ls) = out else {
            panic!("expected LineString");
        };
        assert!(ls.0.len() < 8);
        assert_eq!(ls.0.first().unwrap().x, 0.0);
        assert_eq!(ls.0.last().unwrap().x, 10.0);
    }

    #[test]
    fn test_large_tolerance_leaves_chord() {
        let params = SimplifyParams { tolerance: 10.0, ..Default::default() };
        let out = simplify(&Geometry::LineString(coastline()), &params);
        assert_eq!(vertex_count(&out), 2);
    }

    #[test]
    fn test_zero_tolerance_is_identity() {
        let params = SimplifyParams { tolerance: 0.0, ..Default::default() };
        let out = simplify(&Geometry::LineString(coastline()), &params);
        assert_eq!(vertex_count(&out), 8);
    }

    #[test]
    fn test_visvalingam() {
        let params = SimplifyParams {
            tolerance: 0.5,
            method: SimplifyMethod::VisvalingamWhyatt,
        };
        let out = simplify(&Geometry::LineString(coastline()), &params);
        assert!(vertex_count(&out) < 8);
    }

    #[test]
    fn test_polygon_ring_stays_closed() {
        let ring = LineString::from(vec![
            (0.0, 0.0),
            (2.0, 0.05),
            (5.0, 0.0),
            (5.0, 5.0),
            (2.5, 5.05),
            (0.0, 5.0),
            (0.0, 0.0),
        ]);
        let params = SimplifyParams { tolerance: 0.2, ..Default::default() };
        let out = simplify(&Geometry::Polygon(Polygon::new(ring, vec![])), &params);
        let Geometry::Polygon(p) = out else {
            panic!("expected Polygon");
        };
        assert_eq!(p.exterior().0.len(), 5);
        assert_eq!(p.exterior().0.first(), p.exterior().0.last());
    }

    #[test]
    fn test_simplify_features_keeps_attributes_and_points() {
        let fc: FeatureCollection = vec![
            Feature::new(Geometry::LineString(coastline())).with_property("name", "coast"),
            Feature::new(Geometry::Point(Point::new(1.0, 2.0))),
        ]
        .into_iter()
        .collect();
        let params = SimplifyParams { tolerance: 10.0, ..Default::default() };
        let out = simplify_features(&fc, &params).unwrap();
        assert_eq!(vertex_count(out.features[0].geometry.as_ref().unwrap()), 2);
        assert!(out.features[0].get_property("name").is_some());
        assert!(matches!(out.features[1].geometry, Some(Geometry::Point(_))));
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let params = SimplifyParams { tolerance: -1.0, ..Default::default() };
        assert!(simplify_features(&FeatureCollection::new(), &params).is_err());
    }
}
