//! Stop Index: the node-to-routes join table.
//!
//! A pure derivation from the scenario's node rows and the built schedule,
//! rebuildable at any time. The qualification engine queries it by node ID
//! in O(1) after an O(total stops) build.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::Schedule;
use crate::domain::{DataIssue, NodeId, Position, RouteName};
use crate::scenario::ScenarioInput;

/// One route serving a stop node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Serving {
    pub route: RouteName,
    /// Index of the node within the route's consolidated stop sequence.
    pub stop_position: usize,
}

/// A physical stop node and the routes serving it.
#[derive(Debug, Clone, Serialize)]
pub struct StopNode {
    pub id: NodeId,
    /// Coordinates carried through from the network file, if present.
    pub position: Option<Position>,
    servings: Vec<Serving>,
}

impl StopNode {
    /// Routes serving this node, sorted by name.
    pub fn servings(&self) -> &[Serving] {
        &self.servings
    }

    /// Sorted route names, for evidence reporting.
    pub fn route_names(&self) -> Vec<RouteName> {
        self.servings.iter().map(|s| s.route.clone()).collect()
    }
}

/// All stop nodes of a scenario, keyed and iterated in node-ID order.
#[derive(Debug, Default)]
pub struct StopIndex {
    nodes: BTreeMap<NodeId, StopNode>,
}

impl StopIndex {
    /// Derive the index from the scenario's node rows and the schedule.
    ///
    /// A node row naming a route the schedule never saw is a
    /// [`DataIssue::DanglingRouteReference`]; rows for routes excluded as
    /// malformed are dropped silently, since those were already reported.
    pub fn build(input: &ScenarioInput, schedule: &Schedule) -> (Self, Vec<DataIssue>) {
        let mut nodes: BTreeMap<NodeId, StopNode> = BTreeMap::new();
        let mut issues = Vec::new();

        for record in &input.stop_nodes {
            if !record.is_stop {
                continue;
            }
            let node = NodeId(record.node);

            let Ok(name) = RouteName::parse(&record.line) else {
                // An unusable line name was already reported during the
                // schedule build if a line record carried it; a node row
                // with a blank line name matches nothing.
                issues.push(DataIssue::DanglingRouteReference {
                    node,
                    route: record.line.clone(),
                });
                continue;
            };

            let Some(route) = schedule.get(&name) else {
                if !schedule.is_excluded(name.as_str()) {
                    issues.push(DataIssue::DanglingRouteReference {
                        node,
                        route: record.line.clone(),
                    });
                }
                continue;
            };

            let entry = nodes.entry(node).or_insert_with(|| StopNode {
                id: node,
                position: None,
                servings: Vec::new(),
            });
            if entry.position.is_none() {
                entry.position = Some(Position {
                    x: record.x,
                    y: record.y,
                });
            }
            // The route's stop list is deduplicated, so the position lookup
            // cannot fail for a row that contributed to it.
            let stop_position = match route.stop_position(node) {
                Some(p) => p,
                None => continue,
            };
            let serving = Serving {
                route: name,
                stop_position,
            };
            if !entry.servings.contains(&serving) {
                entry.servings.push(serving);
            }
        }

        for stop in nodes.values_mut() {
            stop.servings.sort_by(|a, b| a.route.cmp(&b.route));
        }

        debug!(nodes = nodes.len(), issues = issues.len(), "stop index built");
        (Self { nodes }, issues)
    }

    pub fn get(&self, node: NodeId) -> Option<&StopNode> {
        self.nodes.get(&node)
    }

    /// All stop nodes in ascending node-ID order.
    pub fn nodes(&self) -> impl Iterator<Item = &StopNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
