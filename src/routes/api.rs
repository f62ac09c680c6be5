// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes driving the selection store.
//!
//! Every mutating route runs exactly one store transition while holding the
//! store lock, then answers with the freshly projected view.

use crate::error::{AppError, Result};
use crate::models::view::SolutionListItem;
use crate::models::RenderModel;
use crate::store::state::PROVENANCE_KEY;
use crate::store::{LoadStatus, OperationOutcome, OutcomeKind, SelectionState, SelectionStore};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Longest solution or feature id accepted in a path.
const MAX_ID_LEN: usize = 200;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/view", get(get_view))
        .route("/api/solutions", get(list_solutions))
        .route("/api/solutions/{id}", get(get_solution))
        .route("/api/solutions/{id}/toggle", post(toggle_solution))
        .route("/api/features/{id}/toggle", post(toggle_feature))
        .route("/api/selection", delete(clear_selection))
        .route("/api/operations/union", post(apply_union))
        .route("/api/operations/intersect", post(apply_intersect))
}

/// Mutations and lookups need a settled, successful load.
fn ensure_ready(state: &SelectionState) -> Result<()> {
    match state.status() {
        LoadStatus::Ready { .. } => Ok(()),
        LoadStatus::Loading => Err(AppError::NotReady),
        LoadStatus::Failed { message } => Err(AppError::LoadFailed(message.clone())),
    }
}

fn validate_id(id: &str) -> Result<()> {
    if id.len() > MAX_ID_LEN {
        return Err(AppError::BadRequest(format!(
            "Identifier longer than {} characters",
            MAX_ID_LEN
        )));
    }
    Ok(())
}

// ─── View ────────────────────────────────────────────────────

/// Current render model. Always answers, including while loading.
async fn get_view(State(state): State<Arc<AppState>>) -> Json<RenderModel> {
    let store = state.store.lock().await;
    Json(store.project())
}

// ─── Solutions ───────────────────────────────────────────────

async fn list_solutions(State(state): State<Arc<AppState>>) -> Result<Json<Vec<SolutionListItem>>> {
    let store = state.store.lock().await;
    ensure_ready(store.state())?;
    Ok(Json(store.project().solutions))
}

/// Solution detail with per-feature areas.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SolutionDetailResponse {
    pub id: String,
    pub active: bool,
    pub features: Vec<FeatureSummary>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FeatureSummary {
    pub id: String,
    pub geometry_type: String,
    /// Square meters
    pub area: f64,
    pub selected: bool,
    /// Operation that synthesized this feature, if any
    pub generated_by: Option<String>,
}

async fn get_solution(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SolutionDetailResponse>> {
    validate_id(&id)?;
    let store = state.store.lock().await;
    ensure_ready(store.state())?;

    let selection = store.state();
    let solution = selection
        .solution(&id)
        .ok_or_else(|| AppError::NotFound(format!("Solution {} not found", id)))?;

    let features = solution
        .features
        .iter()
        .map(|f| FeatureSummary {
            id: f.id.clone(),
            geometry_type: f.geometry.type_name().to_string(),
            area: store.feature_area(f),
            selected: selection.is_selected(&f.id),
            generated_by: f
                .properties
                .get(PROVENANCE_KEY)
                .and_then(|v| v.as_str())
                .map(String::from),
        })
        .collect();

    Ok(Json(SolutionDetailResponse {
        id: solution.id.clone(),
        active: selection.is_active(&solution.id),
        features,
    }))
}

async fn toggle_solution(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RenderModel>> {
    validate_id(&id)?;
    let mut store = state.store.lock().await;
    ensure_ready(store.state())?;

    store.toggle_solution_selection(&id);
    Ok(Json(store.project()))
}

// ─── Polygon selection ───────────────────────────────────────

async fn toggle_feature(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RenderModel>> {
    validate_id(&id)?;
    let mut store = state.store.lock().await;
    ensure_ready(store.state())?;

    store.toggle_polygon_selection(&id);
    Ok(Json(store.project()))
}

async fn clear_selection(State(state): State<Arc<AppState>>) -> Result<Json<RenderModel>> {
    let mut store = state.store.lock().await;
    ensure_ready(store.state())?;

    store.clear_polygon_selection();
    Ok(Json(store.project()))
}

// ─── Boolean operations ──────────────────────────────────────

/// Outcome of a union/intersect request.
///
/// Rejections are reported here with HTTP 200; `outcome` tells them apart.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct OperationResponse {
    pub outcome: OutcomeKind,
    /// Text for the toast/snackbar
    pub message: String,
    pub feature_id: Option<String>,
    /// Area of the synthesized feature (m²)
    pub area: Option<f64>,
    pub view: RenderModel,
}

async fn apply_union(State(state): State<Arc<AppState>>) -> Result<Json<OperationResponse>> {
    let mut store = state.store.lock().await;
    ensure_ready(store.state())?;

    let outcome = store.apply_union();
    Ok(Json(operation_response(&store, outcome)))
}

async fn apply_intersect(State(state): State<Arc<AppState>>) -> Result<Json<OperationResponse>> {
    let mut store = state.store.lock().await;
    ensure_ready(store.state())?;

    let outcome = store.apply_intersect();
    Ok(Json(operation_response(&store, outcome)))
}

fn operation_response(store: &SelectionStore, outcome: OperationOutcome) -> OperationResponse {
    let (feature_id, area) = match &outcome {
        OperationOutcome::Completed {
            feature_id, area, ..
        } => (Some(feature_id.clone()), Some(*area)),
        OperationOutcome::Rejected(_) => (None, None),
    };

    OperationResponse {
        outcome: outcome.kind(),
        message: outcome.message(),
        feature_id,
        area,
        view: store.project(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_ready_maps_status() {
        let loading = SelectionState::default();
        assert!(matches!(ensure_ready(&loading), Err(AppError::NotReady)));

        let failed = loading.load_failed("no files".to_string());
        assert!(matches!(
            ensure_ready(&failed),
            Err(AppError::LoadFailed(ref m)) if m == "no files"
        ));

        let ready = loading.seeded(vec![], "now".to_string());
        assert!(ensure_ready(&ready).is_ok());
    }

    #[test]
    fn test_validate_id_length() {
        assert!(validate_id("solution-1").is_ok());
        assert!(matches!(
            validate_id(&"x".repeat(MAX_ID_LEN + 1)),
            Err(AppError::BadRequest(_))
        ));
    }
}
