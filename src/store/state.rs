// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Selection state and its transitions.
//!
//! `SelectionState` is an immutable value. Every transition borrows the
//! current state and returns the next one, so a rejected transition simply
//! hands back a copy with only the message changed. Solutions are shared
//! through `Arc`, which keeps untouched solutions the same allocation across
//! transitions.

use crate::models::solution::assign_unique_ids;
use crate::models::{Feature, Properties, Solution};
use crate::services::geometry::{BooleanOp, GeometryAdapter, GeometryError};
use crate::store::outcome::{OperationOutcome, OperationRejection};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Property key marking which operation synthesized a feature.
pub const PROVENANCE_KEY: &str = "generatedBy";

/// Progress of the one-shot initial load.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum LoadStatus {
    #[default]
    Loading,
    Ready {
        /// RFC3339 timestamp
        loaded_at: String,
    },
    Failed {
        message: String,
    },
}

/// Feature id -> (solution index, feature index).
///
/// Rebuilt whenever `solutions` is replaced. The first occurrence of an id
/// wins, matching a front-to-back scan.
#[derive(Debug, Clone, Default)]
pub struct FeatureIndex {
    positions: HashMap<String, (usize, usize)>,
}

impl FeatureIndex {
    pub fn build(solutions: &[Arc<Solution>]) -> Self {
        let mut positions = HashMap::new();
        for (solution_index, solution) in solutions.iter().enumerate() {
            for (feature_index, feature) in solution.features.iter().enumerate() {
                if positions.contains_key(&feature.id) {
                    tracing::warn!(
                        feature_id = %feature.id,
                        solution_id = %solution.id,
                        "Duplicate feature id; keeping first occurrence"
                    );
                    continue;
                }
                positions.insert(feature.id.clone(), (solution_index, feature_index));
            }
        }
        Self { positions }
    }

    pub fn position(&self, feature_id: &str) -> Option<(usize, usize)> {
        self.positions.get(feature_id).copied()
    }

    pub fn contains(&self, feature_id: &str) -> bool {
        self.positions.contains_key(feature_id)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Generates identifiers for synthesized features.
///
/// Ids look like `union-1718031234567-3`: operation, wall-clock millis, and
/// a per-generator sequence number.
#[derive(Debug, Default)]
pub struct FeatureIdGenerator {
    seq: u64,
}

impl FeatureIdGenerator {
    pub fn next_id(&mut self, op: BooleanOp, taken: &FeatureIndex) -> String {
        loop {
            self.seq += 1;
            let candidate = format!(
                "{}-{}-{}",
                op.as_str(),
                chrono::Utc::now().timestamp_millis(),
                self.seq
            );
            if !taken.contains(&candidate) {
                return candidate;
            }
        }
    }
}

/// The root aggregate: solutions plus everything the user has selected.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    solutions: Vec<Arc<Solution>>,
    active_solutions: Vec<Arc<Solution>>,
    selected_feature_ids: Vec<String>,
    total_area: f64,
    last_operation_message: String,
    status: LoadStatus,
    index: FeatureIndex,
}

impl SelectionState {
    pub fn solutions(&self) -> &[Arc<Solution>] {
        &self.solutions
    }

    pub fn active_solutions(&self) -> &[Arc<Solution>] {
        &self.active_solutions
    }

    /// Selected feature ids, in selection order.
    pub fn selected_feature_ids(&self) -> &[String] {
        &self.selected_feature_ids
    }

    pub fn is_selected(&self, feature_id: &str) -> bool {
        self.selected_feature_ids.iter().any(|id| id == feature_id)
    }

    pub fn is_active(&self, solution_id: &str) -> bool {
        self.active_solutions.iter().any(|s| s.id == solution_id)
    }

    /// Area of the selected features in m².
    pub fn total_area(&self) -> f64 {
        self.total_area
    }

    pub fn last_operation_message(&self) -> &str {
        &self.last_operation_message
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn feature_index(&self) -> &FeatureIndex {
        &self.index
    }

    /// Look up a feature anywhere in the solutions.
    pub fn feature(&self, feature_id: &str) -> Option<&Feature> {
        let (solution_index, feature_index) = self.index.position(feature_id)?;
        self.solutions
            .get(solution_index)?
            .features
            .get(feature_index)
    }

    pub fn solution(&self, solution_id: &str) -> Option<&Arc<Solution>> {
        self.solutions.iter().find(|s| s.id == solution_id)
    }

    /// Sum of the areas of the selected features.
    ///
    /// Ids that no longer resolve and non-areal features count as zero.
    pub fn compute_total_area<G: GeometryAdapter>(&self, geometry: &G) -> f64 {
        self.selected_feature_ids
            .iter()
            .filter_map(|id| self.feature(id))
            .filter(|f| f.geometry.is_areal())
            .map(|f| geometry.area(f))
            .sum()
    }

    // ─── Transitions ─────────────────────────────────────────────

    /// Replace all solutions with a freshly loaded set.
    pub fn seeded(&self, mut solutions: Vec<Solution>, loaded_at: String) -> Self {
        assign_unique_ids(&mut solutions);
        let solutions: Vec<Arc<Solution>> = solutions.into_iter().map(Arc::new).collect();
        let index = FeatureIndex::build(&solutions);

        tracing::info!(
            solutions = solutions.len(),
            features = index.len(),
            "Solutions seeded"
        );

        Self {
            solutions,
            active_solutions: Vec::new(),
            selected_feature_ids: Vec::new(),
            total_area: 0.0,
            last_operation_message: String::new(),
            status: LoadStatus::Ready { loaded_at },
            index,
        }
    }

    /// Record a failed initial load. Solutions stay as they are.
    pub fn load_failed(&self, message: String) -> Self {
        Self {
            status: LoadStatus::Failed { message },
            ..self.clone()
        }
    }

    /// Single-select toggle of the active solution.
    ///
    /// Toggling the sole active solution clears the focus. Unknown ids leave
    /// the state unchanged.
    pub fn with_solution_toggled(&self, solution_id: &str) -> Self {
        let is_sole_active =
            self.active_solutions.len() == 1 && self.active_solutions[0].id == solution_id;

        if is_sole_active {
            tracing::debug!(solution_id, "Solution deselected");
            return Self {
                active_solutions: Vec::new(),
                ..self.clone()
            };
        }

        match self.solution(solution_id) {
            Some(solution) => {
                tracing::debug!(solution_id, "Solution selected");
                Self {
                    active_solutions: vec![Arc::clone(solution)],
                    ..self.clone()
                }
            }
            None => {
                tracing::debug!(solution_id, "Ignoring toggle of unknown solution");
                self.clone()
            }
        }
    }

    /// Add or remove a feature from the selection and recompute the area.
    ///
    /// Ids that match no feature are ignored, so the selection only ever
    /// holds resolvable ids.
    pub fn with_polygon_toggled<G: GeometryAdapter>(&self, feature_id: &str, geometry: &G) -> Self {
        let mut next = self.clone();

        if next.is_selected(feature_id) {
            next.selected_feature_ids.retain(|id| id != feature_id);
        } else if next.index.contains(feature_id) {
            next.selected_feature_ids.push(feature_id.to_string());
        } else {
            tracing::debug!(feature_id, "Ignoring toggle of unknown feature");
            return next;
        }

        next.total_area = next.compute_total_area(geometry);
        tracing::debug!(
            feature_id,
            selected = next.selected_feature_ids.len(),
            total_area = next.total_area,
            "Polygon selection toggled"
        );
        next
    }

    /// Empty the selection. Area drops to zero with it.
    pub fn with_selection_cleared(&self) -> Self {
        Self {
            selected_feature_ids: Vec::new(),
            total_area: 0.0,
            ..self.clone()
        }
    }

    /// Apply a boolean operation to the selected features.
    ///
    /// On success the consumed features are removed from every solution that
    /// held them, the synthesized feature is appended in their place, focus
    /// moves to the replaced solutions and the selection is cleared. Any
    /// rejection returns the prior state with only the message updated.
    pub fn with_boolean_applied<G: GeometryAdapter>(
        &self,
        operation: BooleanOp,
        geometry: &G,
        ids: &mut FeatureIdGenerator,
    ) -> (Self, OperationOutcome) {
        let selected = self.selected_feature_ids.len();
        if selected < 2 {
            return self.rejected(OperationRejection::NotEnoughSelected {
                operation,
                selected,
            });
        }

        // Resolve by position so only the selected occurrences are consumed
        let resolved: Vec<((usize, usize), &Feature)> = self
            .selected_feature_ids
            .iter()
            .filter_map(|id| {
                let position = self.index.position(id)?;
                let feature = self.feature(id)?;
                Some((position, feature))
            })
            .filter(|(_, f)| f.geometry.is_areal())
            .collect();
        if resolved.len() < 2 {
            return self.rejected(OperationRejection::NotEnoughResolved {
                operation,
                resolved: resolved.len(),
            });
        }

        let inputs: Vec<&Feature> = resolved.iter().map(|(_, f)| *f).collect();
        let combined = match geometry.combine(&inputs, operation) {
            Ok(Some(combined)) => combined,
            Ok(None) => {
                let rejection = match operation {
                    BooleanOp::Intersect => OperationRejection::EmptyIntersection,
                    BooleanOp::Union => OperationRejection::GeometryFailure {
                        operation,
                        source: GeometryError::EmptyUnion,
                    },
                };
                return self.rejected(rejection);
            }
            Err(source) => {
                return self.rejected(OperationRejection::GeometryFailure { operation, source });
            }
        };

        let consumed: HashSet<(usize, usize)> = resolved.iter().map(|(p, _)| *p).collect();
        let feature_id = ids.next_id(operation, &self.index);
        let mut properties = Properties::new();
        properties.insert(PROVENANCE_KEY.to_string(), operation.as_str().into());

        let mut replaced: Vec<Arc<Solution>> = Vec::new();
        let solutions: Vec<Arc<Solution>> = self
            .solutions
            .iter()
            .enumerate()
            .map(|(solution_index, solution)| {
                let is_consumed = |feature_index: usize| {
                    consumed.contains(&(solution_index, feature_index))
                };
                if !(0..solution.features.len()).any(is_consumed) {
                    return Arc::clone(solution);
                }

                // Each replaced solution gets its own copy under a fresh id
                let copy_id = if replaced.is_empty() {
                    feature_id.clone()
                } else {
                    ids.next_id(operation, &self.index)
                };
                let mut features: Vec<Feature> = solution
                    .features
                    .iter()
                    .enumerate()
                    .filter(|(feature_index, _)| !is_consumed(*feature_index))
                    .map(|(_, f)| f.clone())
                    .collect();
                features.push(Feature {
                    id: copy_id,
                    geometry: combined.geometry.clone(),
                    properties: properties.clone(),
                });

                let replacement = Arc::new(Solution {
                    id: solution.id.clone(),
                    features,
                });
                replaced.push(Arc::clone(&replacement));
                replacement
            })
            .collect();

        let outcome = OperationOutcome::Completed {
            operation,
            feature_id,
            area: combined.area,
            replaced_solution_ids: replaced.iter().map(|s| s.id.clone()).collect(),
        };

        tracing::info!(
            op = operation.as_str(),
            consumed = consumed.len(),
            replaced = replaced.len(),
            area = combined.area,
            "Boolean operation applied"
        );

        let index = FeatureIndex::build(&solutions);
        let active_solutions = if replaced.is_empty() {
            self.active_solutions.clone()
        } else {
            replaced
        };

        let next = Self {
            solutions,
            active_solutions,
            selected_feature_ids: Vec::new(),
            total_area: 0.0,
            last_operation_message: outcome.message(),
            status: self.status.clone(),
            index,
        };
        (next, outcome)
    }

    fn rejected(&self, rejection: OperationRejection) -> (Self, OperationOutcome) {
        tracing::warn!(
            reason = %rejection,
            selected = self.selected_feature_ids.len(),
            "Boolean operation rejected"
        );
        let next = Self {
            last_operation_message: rejection.to_string(),
            ..self.clone()
        };
        (next, OperationOutcome::Rejected(rejection))
    }
}
