// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Solution and feature models with their polygon geometry.

use geo::{Geometry, MultiPolygon, Polygon};
use std::collections::HashSet;

/// Free-form feature metadata, as carried by GeoJSON `properties`.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// A single selectable map entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Globally unique identifier (e.g., "solution-1-feature-3")
    pub id: String,
    pub geometry: FeatureGeometry,
    pub properties: Properties,
}

/// A named collection of features, selectable as a unit in the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub id: String,
    pub features: Vec<Feature>,
}

/// Feature geometry - areal shapes plus anything else the source carried.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
    /// Points, lines and collections. Never areal, never rendered.
    Other(Geometry<f64>),
}

impl FeatureGeometry {
    /// Collapse a boolean-operation result: one part stays a Polygon.
    pub fn from_multi_polygon(mut multi: MultiPolygon<f64>) -> Self {
        if multi.0.len() == 1 {
            if let Some(poly) = multi.0.pop() {
                return FeatureGeometry::Polygon(poly);
            }
        }
        FeatureGeometry::MultiPolygon(multi)
    }

    pub fn is_areal(&self) -> bool {
        !matches!(self, FeatureGeometry::Other(_))
    }

    /// Polygon parts of this geometry; empty for non-areal geometry.
    pub fn polygons(&self) -> &[Polygon<f64>] {
        match self {
            FeatureGeometry::Polygon(p) => std::slice::from_ref(p),
            FeatureGeometry::MultiPolygon(mp) => &mp.0,
            FeatureGeometry::Other(_) => &[],
        }
    }

    /// GeoJSON-style type name, used in log fields.
    pub fn type_name(&self) -> &'static str {
        match self {
            FeatureGeometry::Polygon(_) => "Polygon",
            FeatureGeometry::MultiPolygon(_) => "MultiPolygon",
            FeatureGeometry::Other(Geometry::Point(_)) => "Point",
            FeatureGeometry::Other(Geometry::MultiPoint(_)) => "MultiPoint",
            FeatureGeometry::Other(Geometry::LineString(_)) => "LineString",
            FeatureGeometry::Other(Geometry::MultiLineString(_)) => "MultiLineString",
            FeatureGeometry::Other(Geometry::GeometryCollection(_)) => "GeometryCollection",
            FeatureGeometry::Other(_) => "Other",
        }
    }
}

/// Make solution and feature identifiers unique across the whole set.
///
/// The first occurrence of an identifier keeps it. Empty and repeated
/// identifiers are replaced by `solution-<n>` and `solution-<n>-feature-<m>`,
/// both 1-indexed by position, with a `-<k>` suffix if that is taken too.
pub fn assign_unique_ids(solutions: &mut [Solution]) {
    let mut solution_ids = HashSet::new();
    let mut feature_ids = HashSet::new();
    let mut pending_solutions = Vec::new();
    let mut pending_features = Vec::new();

    for (solution_index, solution) in solutions.iter().enumerate() {
        if solution.id.is_empty() || !solution_ids.insert(solution.id.clone()) {
            pending_solutions.push(solution_index);
        }
        for (feature_index, feature) in solution.features.iter().enumerate() {
            if feature.id.is_empty() || !feature_ids.insert(feature.id.clone()) {
                pending_features.push((solution_index, feature_index));
            }
        }
    }

    for solution_index in pending_solutions {
        let id = claim(default_solution_id(solution_index + 1), &mut solution_ids);
        let solution = &mut solutions[solution_index];
        if !solution.id.is_empty() {
            tracing::warn!(duplicate = %solution.id, reassigned = %id, "Duplicate solution id");
        }
        solution.id = id;
    }

    for (solution_index, feature_index) in pending_features {
        let id = claim(
            default_feature_id(solution_index + 1, feature_index + 1),
            &mut feature_ids,
        );
        let feature = &mut solutions[solution_index].features[feature_index];
        if !feature.id.is_empty() {
            tracing::warn!(duplicate = %feature.id, reassigned = %id, "Duplicate feature id");
        }
        feature.id = id;
    }
}

/// First of `base`, `base-2`, `base-3`, ... not yet in `taken`; records it.
fn claim(base: String, taken: &mut HashSet<String>) -> String {
    let mut candidate = base.clone();
    let mut suffix = 2;
    while !taken.insert(candidate.clone()) {
        candidate = format!("{}-{}", base, suffix);
        suffix += 1;
    }
    candidate
}

/// `solution-<n>`, 1-indexed.
pub fn default_solution_id(n: usize) -> String {
    format!("solution-{}", n)
}

/// `solution-<n>-feature-<m>`, both 1-indexed.
pub fn default_feature_id(n: usize, m: usize) -> String {
    format!("solution-{}-feature-{}", n, m)
}
