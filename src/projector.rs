// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derivation of the render model from selection state.
//!
//! Pure functions only; projecting the same state twice yields equal models.

use crate::models::view::{
    RenderModel, RenderPolygon, SolutionListItem, SolutionStatistics, Statistics,
};
use crate::store::SelectionState;
use geo::{LineString, Polygon};

/// Build everything the map and sidebars draw from the current state.
pub fn project(state: &SelectionState) -> RenderModel {
    let solutions = state
        .solutions()
        .iter()
        .enumerate()
        .map(|(index, solution)| SolutionListItem {
            id: solution.id.clone(),
            label: format!("Solution {}", index + 1),
            feature_count: solution.features.len() as u32,
            active: state.is_active(&solution.id),
        })
        .collect();

    let polygons: Vec<RenderPolygon> = state
        .active_solutions()
        .iter()
        .flat_map(|solution| solution.features.iter())
        .flat_map(|feature| {
            let selected = state.is_selected(&feature.id);
            feature
                .geometry
                .polygons()
                .iter()
                .map(move |polygon| RenderPolygon {
                    feature_id: feature.id.clone(),
                    rings: lat_lon_rings(polygon),
                    selected,
                })
        })
        .collect();

    let center = polygons
        .first()
        .and_then(|polygon| polygon.rings.first())
        .and_then(|ring| ring_center(ring));

    let statistics = Statistics {
        solutions: state
            .active_solutions()
            .iter()
            .map(|solution| SolutionStatistics {
                id: solution.id.clone(),
                feature_count: solution.features.len() as u32,
            })
            .collect(),
        total_area: state.total_area(),
        total_area_label: format_area(state.total_area()),
    };

    RenderModel {
        status: state.status().clone(),
        solutions,
        polygons,
        center,
        selected_feature_ids: state.selected_feature_ids().to_vec(),
        statistics,
        message: state.last_operation_message().to_string(),
    }
}

/// Square meters with two decimals, e.g. "1234.57 m²".
pub fn format_area(area: f64) -> String {
    format!("{:.2} m²", area)
}

/// Exterior then holes, each as `[lat, lon]` pairs.
fn lat_lon_rings(polygon: &Polygon<f64>) -> Vec<Vec<[f64; 2]>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(lat_lon_ring)
        .collect()
}

fn lat_lon_ring(ring: &LineString<f64>) -> Vec<[f64; 2]> {
    ring.coords().map(|c| [c.y, c.x]).collect()
}

/// Mean of the ring's points, closing point included.
fn ring_center(ring: &[[f64; 2]]) -> Option<[f64; 2]> {
    if ring.is_empty() {
        return None;
    }
    let n = ring.len() as f64;
    let (lat, lon) = ring
        .iter()
        .fold((0.0, 0.0), |(lat, lon), p| (lat + p[0], lon + p[1]));
    Some([lat / n, lon / n])
}
