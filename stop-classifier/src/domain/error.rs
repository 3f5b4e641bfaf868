//! Data-issue taxonomy for scenario validation.
//!
//! Structural problems in the scenario are collected as values and surfaced
//! as a batch report, so a planning analyst sees the full list of data
//! problems in one pass. Only strict mode turns the first issue into a hard
//! error.

use super::NodeId;
use serde::Serialize;

/// A structural problem found while building the schedule or stop index.
///
/// The offending record is excluded from classification but the batch
/// continues; silently skipping would under- or over-count major stops.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataIssue {
    /// A route record that cannot participate in classification.
    #[error("malformed route {route}: {reason}")]
    MalformedRoute { route: String, reason: String },

    /// A stop-node record referencing a route absent from the schedule.
    #[error("stop node {node} references unknown route {route}")]
    DanglingRouteReference { node: NodeId, route: String },
}

impl DataIssue {
    /// The route name the issue concerns, as written in the input.
    pub fn route(&self) -> &str {
        match self {
            DataIssue::MalformedRoute { route, .. } => route,
            DataIssue::DanglingRouteReference { route, .. } => route,
        }
    }
}

/// Hard failure from a classification run.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClassifyError {
    /// Strict mode: the first structural issue aborts the run.
    #[error("strict mode: {0}")]
    Strict(DataIssue),

    /// Scenario exceeds the configured input-size guard.
    #[error("scenario too large: {records} records exceeds limit of {limit}")]
    ScenarioTooLarge { records: usize, limit: usize },
}

/// Convenience alias used by the engine entry points.
pub type ClassifyResult<T> = Result<T, ClassifyError>;
