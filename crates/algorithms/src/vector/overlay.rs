//! Polygon overlay (intersection)
//!
//! Pairs every polygonal feature of one layer with every polygonal feature
//! of another and keeps the non-empty intersections, carrying the
//! attributes of both parents. The clipping itself is `geo::BooleanOps`.

use geo::{Area, BooleanOps, BoundingRect, Geometry, Intersects, MultiPolygon, Rect};
use surtclass_core::{Feature, FeatureCollection};
use tracing::debug;

/// View a geometry as a multipolygon, if it is polygonal.
pub(crate) fn as_multipolygon(geom: &Geometry<f64>) -> Option<MultiPolygon<f64>> {
    match geom {
        Geometry::Polygon(p) => Some(MultiPolygon::new(vec![p.clone()])),
        Geometry::MultiPolygon(mp) => Some(mp.clone()),
        Geometry::Rect(r) => Some(MultiPolygon::new(vec![r.to_polygon()])),
        Geometry::Triangle(t) => Some(MultiPolygon::new(vec![t.to_polygon()])),
        _ => None,
    }
}

/// Collapse single-part multipolygons back into polygons.
pub(crate) fn into_geometry(mp: MultiPolygon<f64>) -> Geometry<f64> {
    if mp.0.len() == 1 {
        let mut parts = mp.0;
        Geometry::Polygon(parts.remove(0))
    } else {
        Geometry::MultiPolygon(mp)
    }
}

/// Intersection overlay of two polygon layers.
///
/// Output features hold the intersected geometry and the union of both
/// parents' attributes; on a key collision the right-hand value wins.
/// Features without polygonal geometry are ignored, as are intersections
/// with zero area (shared edges or corners).
pub fn overlay_intersection(left: &FeatureCollection, right: &FeatureCollection) -> FeatureCollection {
    let prepare = |fc: &FeatureCollection| -> Vec<(usize, MultiPolygon<f64>, Rect<f64>)> {
        fc.iter()
            .enumerate()
            .filter_map(|(i, f)| {
                let mp = f.geometry.as_ref().and_then(as_multipolygon)?;
                let bbox = mp.bounding_rect()?;
                Some((i, mp, bbox))
            })
            .collect()
    };
    let lhs = prepare(left);
    let rhs = prepare(right);

    let mut out = FeatureCollection::new();
    for (li, lmp, lbox) in &lhs {
        for (ri, rmp, rbox) in &rhs {
            if !lbox.intersects(rbox) {
                continue;
            }
            let piece = lmp.intersection(rmp);
            if piece.0.is_empty() || piece.unsigned_area() == 0.0 {
                continue;
            }

            let mut feature = Feature::new(into_geometry(piece));
            feature.properties = left.features[*li].properties.clone();
            for (k, v) in &right.features[*ri].properties {
                feature.set_property(k.clone(), v.clone());
            }
            out.push(feature);
        }
    }

    debug!(
        "overlay: {} x {} polygon features -> {} pieces",
        lhs.len(),
        rhs.len(),
        out.len()
    );
    out
}
