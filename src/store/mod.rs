// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Selection store: owns the current `SelectionState` and applies transitions.

pub mod outcome;
pub mod state;

pub use outcome::{OperationOutcome, OperationRejection, OutcomeKind};
pub use state::{FeatureIdGenerator, FeatureIndex, LoadStatus, SelectionState};

use crate::models::{Feature, RenderModel, Solution};
use crate::projector;
use crate::services::geometry::{BooleanOp, GeoAdapter, GeometryAdapter};
use std::sync::Arc;

/// Authoritative selection state plus the collaborators its transitions need.
///
/// Each method runs one transition to completion and swaps in the new state.
/// Callers that share a store serialize access (see `AppState`).
pub struct SelectionStore<G = GeoAdapter> {
    state: Arc<SelectionState>,
    geometry: G,
    ids: FeatureIdGenerator,
}

impl Default for SelectionStore<GeoAdapter> {
    fn default() -> Self {
        Self::new(GeoAdapter)
    }
}

impl<G: GeometryAdapter> SelectionStore<G> {
    pub fn new(geometry: G) -> Self {
        Self {
            state: Arc::new(SelectionState::default()),
            geometry,
            ids: FeatureIdGenerator::default(),
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Cheap handle on the current state, valid after later transitions.
    pub fn snapshot(&self) -> Arc<SelectionState> {
        Arc::clone(&self.state)
    }

    pub fn project(&self) -> RenderModel {
        projector::project(&self.state)
    }

    /// Area of a single feature in m², measured the same way as `total_area`.
    pub fn feature_area(&self, feature: &Feature) -> f64 {
        self.geometry.area(feature)
    }

    pub fn seed_solutions(&mut self, solutions: Vec<Solution>) {
        let loaded_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        self.commit(self.state.seeded(solutions, loaded_at));
    }

    pub fn fail_load(&mut self, message: String) {
        self.commit(self.state.load_failed(message));
    }

    pub fn toggle_solution_selection(&mut self, solution_id: &str) {
        self.commit(self.state.with_solution_toggled(solution_id));
    }

    pub fn toggle_polygon_selection(&mut self, feature_id: &str) {
        self.commit(self.state.with_polygon_toggled(feature_id, &self.geometry));
    }

    pub fn clear_polygon_selection(&mut self) {
        self.commit(self.state.with_selection_cleared());
    }

    pub fn apply_union(&mut self) -> OperationOutcome {
        self.apply(BooleanOp::Union)
    }

    pub fn apply_intersect(&mut self) -> OperationOutcome {
        self.apply(BooleanOp::Intersect)
    }

    fn apply(&mut self, operation: BooleanOp) -> OperationOutcome {
        let (next, outcome) = self
            .state
            .with_boolean_applied(operation, &self.geometry, &mut self.ids);
        self.commit(next);
        outcome
    }

    fn commit(&mut self, next: SelectionState) {
        self.state = Arc::new(next);
    }
}
