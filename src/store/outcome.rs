// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Outcomes of boolean-operation transitions.

use crate::services::geometry::{BooleanOp, GeometryError};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Result of `apply_union` / `apply_intersect`.
///
/// Every variant carries a plain-text message for the notification surface.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    Completed {
        operation: BooleanOp,
        /// Identifier of the synthesized feature
        feature_id: String,
        /// Area of the synthesized feature (m²)
        area: f64,
        /// Solutions that lost consumed features and gained the result
        replaced_solution_ids: Vec<String>,
    },
    Rejected(OperationRejection),
}

impl OperationOutcome {
    pub fn message(&self) -> String {
        match self {
            OperationOutcome::Completed { operation, .. } => {
                format!("{} operation completed successfully!", operation)
            }
            OperationOutcome::Rejected(rejection) => rejection.to_string(),
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            OperationOutcome::Completed { .. } => OutcomeKind::Completed,
            OperationOutcome::Rejected(rejection) => rejection.kind(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, OperationOutcome::Completed { .. })
    }
}

/// Why a boolean operation left the state untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OperationRejection {
    #[error("{operation} operation requires at least two polygons.")]
    NotEnoughSelected { operation: BooleanOp, selected: usize },

    #[error("Not enough polygons found for {operation} operation.")]
    NotEnoughResolved { operation: BooleanOp, resolved: usize },

    #[error("Intersect operation is not possible for selected polygons.")]
    EmptyIntersection,

    #[error("{operation} operation failed: {source}")]
    GeometryFailure {
        operation: BooleanOp,
        source: GeometryError,
    },
}

impl OperationRejection {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            OperationRejection::NotEnoughSelected { .. }
            | OperationRejection::NotEnoughResolved { .. } => OutcomeKind::ValidationRejected,
            OperationRejection::EmptyIntersection => OutcomeKind::EmptyResult,
            OperationRejection::GeometryFailure { .. } => OutcomeKind::GeometryFailure,
        }
    }
}

/// Wire-level outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum OutcomeKind {
    Completed,
    ValidationRejected,
    EmptyResult,
    GeometryFailure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let rejection = OperationRejection::NotEnoughSelected {
            operation: BooleanOp::Union,
            selected: 1,
        };
        assert_eq!(
            rejection.to_string(),
            "Union operation requires at least two polygons."
        );

        let outcome = OperationOutcome::Completed {
            operation: BooleanOp::Intersect,
            feature_id: "intersect-1-1".to_string(),
            area: 1.0,
            replaced_solution_ids: vec![],
        };
        assert_eq!(
            outcome.message(),
            "Intersect operation completed successfully!"
        );
    }

    #[test]
    fn test_geometry_failure_message_includes_cause() {
        let rejection = OperationRejection::GeometryFailure {
            operation: BooleanOp::Union,
            source: GeometryError::EmptyUnion,
        };
        assert_eq!(
            rejection.to_string(),
            "Union operation failed: Union produced an empty geometry"
        );
        assert_eq!(rejection.kind(), OutcomeKind::GeometryFailure);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            OperationRejection::EmptyIntersection.kind(),
            OutcomeKind::EmptyResult
        );
        assert_eq!(
            OperationRejection::NotEnoughResolved {
                operation: BooleanOp::Intersect,
                resolved: 0
            }
            .kind(),
            OutcomeKind::ValidationRejected
        );
    }
}
