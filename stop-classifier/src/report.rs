//! Result Emitter: per-node qualification results and the batch report.
//!
//! Results are keyed and ordered by node ID so re-runs of the same scenario
//! diff cleanly. Persistence beyond the batch binary's JSON is the
//! downstream report/buffer collaborator's concern.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use serde::Serialize;

use crate::domain::{DataIssue, NodeId, Position, RouteName};

/// The qualifying rule of PRC §21064.3, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MajorStopRule {
    /// An existing rail or bus rapid transit station.
    RailOrBrtStation,
    /// A ferry terminal served by either a bus or rail transit service.
    FerryWithTransit,
    /// The intersection of two or more routes with a peak-period frequency
    /// of 15 minutes or less.
    MajorRouteIntersection,
    /// Not a major transit stop.
    None,
}

impl MajorStopRule {
    pub fn is_major(self) -> bool {
        self != MajorStopRule::None
    }
}

/// Resolved peak headways for one route contributing to an intersection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakHeadways {
    pub route: RouteName,
    pub am_headway_minutes: f64,
    pub pm_headway_minutes: f64,
}

/// Classification outcome for one stop node.
#[derive(Debug, Clone, Serialize)]
pub struct QualificationResult {
    pub node: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    pub is_major: bool,
    pub rule: MajorStopRule,
    /// Every route serving the node, sorted by name.
    pub serving_routes: Vec<RouteName>,
    /// Routes that triggered the recorded rule, sorted by name.
    pub qualifying_routes: Vec<RouteName>,
    /// Per-route peak headways, populated for the intersection rule.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub peak_evidence: Vec<PeakHeadways>,
    /// Pairs of frequent routes whose stop patterns fully contain one
    /// another. Such pairs count as one corridor, and flagged nodes warrant
    /// analyst review before release.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overlapping_pairs: Vec<(RouteName, RouteName)>,
}

/// A complete classification run: per-node results plus data issues.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    /// One result per stop node, ascending node ID.
    pub results: Vec<QualificationResult>,
    /// Structural problems found in the scenario, in discovery order.
    pub issues: Vec<DataIssue>,
}

impl Classification {
    /// Number of nodes that qualified as major transit stops.
    pub fn major_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_major).count()
    }

    /// Only the qualifying nodes, for outputs that drop non-major stops.
    pub fn major_only(&self) -> impl Iterator<Item = &QualificationResult> {
        self.results.iter().filter(|r| r.is_major)
    }

    /// Look up a node's result.
    pub fn get(&self, node: NodeId) -> Option<&QualificationResult> {
        self.results
            .binary_search_by_key(&node, |r| r.node)
            .ok()
            .map(|i| &self.results[i])
    }

    /// Write the full report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).map_err(io::Error::from)
    }
}
