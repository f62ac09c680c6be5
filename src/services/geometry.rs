// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Boolean operations and area measurement over feature geometry.

use crate::models::{Feature, FeatureGeometry};
use geo::{Area, BooleanOps, GeodesicArea, LineString, MultiPolygon};
use serde::Serialize;
use std::fmt;

/// A closed ring needs three distinct points plus the closing point.
const MIN_RING_POINTS: usize = 4;

/// Boolean operation requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanOp {
    Union,
    Intersect,
}

impl BooleanOp {
    /// Lowercase name, used for generated ids and provenance tags.
    pub fn as_str(self) -> &'static str {
        match self {
            BooleanOp::Union => "union",
            BooleanOp::Intersect => "intersect",
        }
    }
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BooleanOp::Union => f.write_str("Union"),
            BooleanOp::Intersect => f.write_str("Intersect"),
        }
    }
}

/// Geometry produced by a successful boolean operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Combined {
    pub geometry: FeatureGeometry,
    /// Square meters
    pub area: f64,
}

/// The geometry engine behind the selection store.
pub trait GeometryAdapter {
    /// Combine two or more areal features.
    ///
    /// `Ok(None)` means the intersection is empty (disjoint inputs or inputs
    /// that only share a boundary). Union never returns `Ok(None)`.
    fn combine(&self, features: &[&Feature], op: BooleanOp)
        -> Result<Option<Combined>, GeometryError>;

    /// Area of a feature in square meters. Non-areal geometry measures 0.
    fn area(&self, feature: &Feature) -> f64;
}

/// `geo`-backed adapter: `BooleanOps` for clipping, geodesic area on WGS84.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoAdapter;

impl GeometryAdapter for GeoAdapter {
    fn combine(
        &self,
        features: &[&Feature],
        op: BooleanOp,
    ) -> Result<Option<Combined>, GeometryError> {
        if features.len() < 2 {
            return Err(GeometryError::TooFewInputs(features.len()));
        }

        let shapes = features
            .iter()
            .map(|f| to_multi_polygon(f))
            .collect::<Result<Vec<_>, _>>()?;
        let mut shapes = shapes.into_iter();
        let Some(first) = shapes.next() else {
            return Err(GeometryError::TooFewInputs(0));
        };

        let result = match op {
            BooleanOp::Union => {
                let merged = drop_degenerate(shapes.fold(first, |acc, shape| acc.union(&shape)));
                if merged.0.is_empty() {
                    return Err(GeometryError::EmptyUnion);
                }
                merged
            }
            BooleanOp::Intersect => {
                let mut common = first;
                for shape in shapes {
                    common = drop_degenerate(common.intersection(&shape));
                    if common.0.is_empty() {
                        return Ok(None);
                    }
                }
                common
            }
        };

        let area = result.geodesic_area_unsigned();
        tracing::debug!(
            op = op.as_str(),
            inputs = features.len(),
            parts = result.0.len(),
            area,
            "Boolean operation computed"
        );

        Ok(Some(Combined {
            geometry: FeatureGeometry::from_multi_polygon(result),
            area,
        }))
    }

    fn area(&self, feature: &Feature) -> f64 {
        match &feature.geometry {
            FeatureGeometry::Polygon(p) => p.geodesic_area_unsigned(),
            FeatureGeometry::MultiPolygon(mp) => mp.geodesic_area_unsigned(),
            FeatureGeometry::Other(_) => 0.0,
        }
    }
}

/// Validate a feature's rings and lift it to a MultiPolygon.
fn to_multi_polygon(feature: &Feature) -> Result<MultiPolygon<f64>, GeometryError> {
    if !feature.geometry.is_areal() {
        return Err(GeometryError::NotAreal(feature.id.clone()));
    }

    let parts = feature.geometry.polygons();
    if parts.is_empty() {
        return Err(GeometryError::EmptyGeometry(feature.id.clone()));
    }

    for polygon in parts {
        validate_ring(&feature.id, polygon.exterior())?;
        for hole in polygon.interiors() {
            validate_ring(&feature.id, hole)?;
        }
    }

    Ok(MultiPolygon(parts.to_vec()))
}

fn validate_ring(feature_id: &str, ring: &LineString<f64>) -> Result<(), GeometryError> {
    if ring.0.len() < MIN_RING_POINTS {
        return Err(GeometryError::DegenerateRing {
            feature_id: feature_id.to_string(),
            points: ring.0.len(),
        });
    }
    if ring.coords().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(GeometryError::NonFiniteCoordinate(feature_id.to_string()));
    }
    Ok(())
}

/// Remove zero-area slivers left behind by clipping along shared edges.
fn drop_degenerate(mut multi: MultiPolygon<f64>) -> MultiPolygon<f64> {
    multi.0.retain(|p| p.unsigned_area() > 0.0);
    multi
}

/// Errors from the geometry engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("At least two polygons are required, got {0}")]
    TooFewInputs(usize),

    #[error("Feature {0} is not a Polygon or MultiPolygon")]
    NotAreal(String),

    #[error("Feature {0} has no polygon parts")]
    EmptyGeometry(String),

    #[error("Feature {feature_id} has a ring with {points} points (need at least 4)")]
    DegenerateRing { feature_id: String, points: usize },

    #[error("Feature {0} has a non-finite coordinate")]
    NonFiniteCoordinate(String),

    #[error("Union produced an empty geometry")]
    EmptyUnion,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Properties;
    use geo::{coord, Geometry, LineString, Point, Polygon, Rect};

    /// Axis-aligned square near the equator, `size` degrees on a side.
    fn square(id: &str, x: f64, y: f64, size: f64) -> Feature {
        let rect = Rect::new(coord! { x: x, y: y }, coord! { x: x + size, y: y + size });
        Feature {
            id: id.to_string(),
            geometry: FeatureGeometry::Polygon(rect.to_polygon()),
            properties: Properties::new(),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= b.abs() * 1e-6
    }

    #[test]
    fn test_area_of_square_is_plausible() {
        // 0.01° at the equator is roughly 1.1 km
        let a = square("a", 0.0, 0.0, 0.01);
        let area = GeoAdapter.area(&a);
        assert!(area > 1.2e6 && area < 1.25e6, "unexpected area {}", area);
    }

    #[test]
    fn test_area_of_non_areal_is_zero() {
        let f = Feature {
            id: "pt".to_string(),
            geometry: FeatureGeometry::Other(Geometry::Point(Point::new(0.0, 0.0))),
            properties: Properties::new(),
        };
        assert_eq!(GeoAdapter.area(&f), 0.0);
    }

    #[test]
    fn test_union_of_overlapping_squares() {
        let a = square("a", 0.0, 0.0, 0.01);
        let b = square("b", 0.005, 0.0, 0.01);

        let combined = GeoAdapter
            .combine(&[&a, &b], BooleanOp::Union)
            .unwrap()
            .expect("union always has a result");

        assert_eq!(combined.geometry.type_name(), "Polygon");
        let sum = GeoAdapter.area(&a) + GeoAdapter.area(&b);
        assert!(combined.area < sum);
        assert!(combined.area > GeoAdapter.area(&a));
    }

    #[test]
    fn test_union_of_disjoint_squares_is_multi_polygon() {
        let a = square("a", 0.0, 0.0, 0.01);
        let b = square("b", 0.05, 0.05, 0.01);

        let combined = GeoAdapter
            .combine(&[&a, &b], BooleanOp::Union)
            .unwrap()
            .unwrap();

        assert_eq!(combined.geometry.type_name(), "MultiPolygon");
        assert_eq!(combined.geometry.polygons().len(), 2);
        let sum = GeoAdapter.area(&a) + GeoAdapter.area(&b);
        assert!(approx(combined.area, sum));
    }

    #[test]
    fn test_intersection_of_overlapping_squares() {
        let a = square("a", 0.0, 0.0, 0.01);
        let b = square("b", 0.005, 0.0, 0.01);
        let overlap = Feature {
            id: "overlap".to_string(),
            geometry: FeatureGeometry::Polygon(
                Rect::new(coord! { x: 0.005, y: 0.0 }, coord! { x: 0.01, y: 0.01 }).to_polygon(),
            ),
            properties: Properties::new(),
        };

        let combined = GeoAdapter
            .combine(&[&a, &b], BooleanOp::Intersect)
            .unwrap()
            .expect("squares overlap");

        assert!(approx(combined.area, GeoAdapter.area(&overlap)));
    }

    #[test]
    fn test_intersection_of_disjoint_squares_is_empty() {
        let a = square("a", 0.0, 0.0, 0.01);
        let b = square("b", 0.05, 0.05, 0.01);

        let result = GeoAdapter.combine(&[&a, &b], BooleanOp::Intersect).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_intersection_of_edge_touching_squares_is_empty() {
        let a = square("a", 0.0, 0.0, 0.01);
        let b = square("b", 0.01, 0.0, 0.01);

        let result = GeoAdapter.combine(&[&a, &b], BooleanOp::Intersect).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_intersection_of_three_stops_at_first_empty() {
        let a = square("a", 0.0, 0.0, 0.01);
        let b = square("b", 0.005, 0.0, 0.01);
        let c = square("c", 0.5, 0.5, 0.01);

        let result = GeoAdapter
            .combine(&[&a, &b, &c], BooleanOp::Intersect)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_multi_polygon_input_is_accepted() {
        let a = square("a", 0.0, 0.0, 0.01);
        let b = square("b", 0.05, 0.05, 0.01);
        let c = square("c", 0.005, 0.0, 0.01);

        let first = GeoAdapter
            .combine(&[&a, &b], BooleanOp::Union)
            .unwrap()
            .unwrap();
        let chained = Feature {
            id: "ab".to_string(),
            geometry: first.geometry,
            properties: Properties::new(),
        };

        let result = GeoAdapter
            .combine(&[&chained, &c], BooleanOp::Union)
            .unwrap()
            .unwrap();
        assert_eq!(result.geometry.polygons().len(), 2);
    }

    #[test]
    fn test_single_input_is_rejected() {
        let a = square("a", 0.0, 0.0, 0.01);
        let err = GeoAdapter.combine(&[&a], BooleanOp::Union).unwrap_err();
        assert_eq!(err, GeometryError::TooFewInputs(1));
    }

    #[test]
    fn test_degenerate_ring_is_rejected() {
        let a = square("a", 0.0, 0.0, 0.01);
        let sliver = Feature {
            id: "sliver".to_string(),
            geometry: FeatureGeometry::Polygon(Polygon::new(
                LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]),
                vec![],
            )),
            properties: Properties::new(),
        };

        let err = GeoAdapter
            .combine(&[&a, &sliver], BooleanOp::Union)
            .unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateRing { ref feature_id, .. } if feature_id == "sliver"));
    }

    #[test]
    fn test_non_finite_coordinate_is_rejected() {
        let a = square("a", 0.0, 0.0, 0.01);
        let broken = Feature {
            id: "nan".to_string(),
            geometry: FeatureGeometry::Polygon(Polygon::new(
                LineString::from(vec![(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0), (0.0, 1.0)]),
                vec![],
            )),
            properties: Properties::new(),
        };

        let err = GeoAdapter
            .combine(&[&a, &broken], BooleanOp::Intersect)
            .unwrap_err();
        assert_eq!(err, GeometryError::NonFiniteCoordinate("nan".to_string()));
    }

    #[test]
    fn test_op_names() {
        assert_eq!(BooleanOp::Union.as_str(), "union");
        assert_eq!(BooleanOp::Intersect.to_string(), "Intersect");
    }
}
