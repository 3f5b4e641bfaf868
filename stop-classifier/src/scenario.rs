//! Scenario input records, as handed over by the Network Importer.
//!
//! These mirror the shape of a parsed planning-model line file: line rows
//! (one per coded route direction, with service periods) and node rows (one
//! per node visited by a line, in traversal order). The importer owns raw
//! file syntax; this module only defines the in-memory hand-off.
//!
//! Validation happens when the schedule is built, not here, so one bad
//! record surfaces as a reported [`DataIssue`](crate::domain::DataIssue)
//! instead of failing the whole hand-off.

use serde::{Deserialize, Serialize};

/// A frequency entry for one service period of a line.
///
/// Times are "HH:MM" strings; they are validated during schedule build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRecord {
    /// Period start, inclusive.
    pub start: String,
    /// Period end, exclusive.
    pub end: String,
    /// Minutes between successive vehicles during the period.
    ///
    /// Fractional headways occur in planning models (e.g. 7.5 for a
    /// doubled-up corridor). Must be positive.
    pub headway_minutes: f64,
}

/// One coded line from the scenario line file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    /// Line name as written, direction suffix included (e.g. `RT51_A`).
    pub name: String,
    /// Raw service mode code, resolved through the configured
    /// service-type map.
    pub mode: String,
    /// Service frequency per time period.
    pub frequencies: Vec<FrequencyRecord>,
}

/// One node row: a node visited by a line, in traversal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopNodeRecord {
    /// Name of the line this row belongs to, as written in the file.
    pub line: String,
    /// Network node number.
    pub node: u32,
    /// Node coordinates in the network's projected system.
    pub x: f64,
    pub y: f64,
    /// Whether the line actually stops here. Pass-through nodes carry
    /// `false` and are excluded from classification.
    #[serde(default = "default_is_stop")]
    pub is_stop: bool,
}

fn default_is_stop() -> bool {
    true
}

/// A complete future-year scenario snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub lines: Vec<LineRecord>,
    pub stop_nodes: Vec<StopNodeRecord>,
}

impl ScenarioInput {
    /// Total record count, for the input-size resource guard.
    pub fn record_count(&self) -> usize {
        self.lines.len() + self.stop_nodes.len()
    }
}
