// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Render model handed to the map and sidebar views.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::store::LoadStatus;

/// Everything the front end needs to draw the current selection state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RenderModel {
    pub status: LoadStatus,
    /// Sidebar list, in load order
    pub solutions: Vec<SolutionListItem>,
    /// Polygons of the active solutions, ready for the map widget
    pub polygons: Vec<RenderPolygon>,
    /// Initial map center as `[lat, lon]`, if anything is visible
    pub center: Option<[f64; 2]>,
    pub selected_feature_ids: Vec<String>,
    pub statistics: Statistics,
    /// Outcome of the last boolean operation, or empty
    pub message: String,
}

/// One entry of the solution list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SolutionListItem {
    pub id: String,
    /// "Solution 1", "Solution 2", ...
    pub label: String,
    pub feature_count: u32,
    pub active: bool,
}

/// A single polygon part of a feature.
///
/// `rings[0]` is the exterior ring, any further rings are holes. Coordinates
/// are `[lat, lon]` as map widgets expect them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RenderPolygon {
    pub feature_id: String,
    pub rings: Vec<Vec<[f64; 2]>>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Statistics {
    pub solutions: Vec<SolutionStatistics>,
    /// Square meters
    pub total_area: f64,
    /// e.g. "1234.57 m²"
    pub total_area_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SolutionStatistics {
    pub id: String,
    pub feature_count: u32,
}
