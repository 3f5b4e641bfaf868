//! Qualification engine: the three PRC §21064.3 tests.
//!
//! For each stop node the tests run in fixed precedence order and the first
//! match wins, so a node qualifying several ways is reported once under the
//! highest-precedence rule. Evaluation is a pure function of the schedule,
//! the stop index and the configuration; input ordering never changes the
//! outcome.
//!
//! The ferry test assumes the ferry dock and its connecting bus or rail
//! stop share one network node. Terminals coded as separate nodes need
//! their node numbering reconciled upstream before this test can see them.

use tracing::{debug, trace};

use super::config::ClassifierConfig;
use crate::domain::{RouteName, ServiceType};
use crate::report::{MajorStopRule, PeakHeadways, QualificationResult};
use crate::schedule::{Route, Schedule, StopIndex, StopNode};

/// Classifier over a frozen scenario snapshot.
///
/// Holds read-only references only; node evaluations are independent of one
/// another, so results are order-independent by construction.
pub struct Classifier<'a> {
    schedule: &'a Schedule,
    index: &'a StopIndex,
    config: &'a ClassifierConfig,
}

impl<'a> Classifier<'a> {
    pub fn new(
        schedule: &'a Schedule,
        index: &'a StopIndex,
        config: &'a ClassifierConfig,
    ) -> Self {
        Self {
            schedule,
            index,
            config,
        }
    }

    /// Classify every stop node, in ascending node-ID order.
    pub fn classify(&self) -> Vec<QualificationResult> {
        let results: Vec<QualificationResult> =
            self.index.nodes().map(|stop| self.qualify(stop)).collect();
        debug!(
            nodes = results.len(),
            major = results.iter().filter(|r| r.is_major).count(),
            "classification complete"
        );
        results
    }

    /// Apply the three tests to one node, first match wins.
    fn qualify(&self, stop: &StopNode) -> QualificationResult {
        // Servings are sorted by route name and refer to routes the
        // schedule built, so this lookup is total and deterministic.
        let routes: Vec<&Route> = stop
            .servings()
            .iter()
            .filter_map(|s| self.schedule.get(&s.route))
            .collect();

        let mut result = QualificationResult {
            node: stop.id,
            position: stop.position,
            is_major: false,
            rule: MajorStopRule::None,
            serving_routes: stop.route_names(),
            qualifying_routes: Vec::new(),
            peak_evidence: Vec::new(),
            overlapping_pairs: Vec::new(),
        };

        // Test 1: rail or BRT station.
        let rail_or_brt: Vec<RouteName> = routes
            .iter()
            .filter(|r| r.service_type().is_rail_or_brt())
            .map(|r| r.name().clone())
            .collect();
        if !rail_or_brt.is_empty() {
            trace!(node = %stop.id, routes = ?rail_or_brt, "rail/BRT station");
            result.is_major = true;
            result.rule = MajorStopRule::RailOrBrtStation;
            result.qualifying_routes = rail_or_brt;
            return result;
        }

        // Test 2: ferry terminal with connecting transit.
        let ferries: Vec<RouteName> = routes
            .iter()
            .filter(|r| r.service_type() == ServiceType::Ferry)
            .map(|r| r.name().clone())
            .collect();
        if !ferries.is_empty() {
            let connecting: Vec<RouteName> = routes
                .iter()
                .filter(|r| r.service_type() != ServiceType::Ferry)
                .map(|r| r.name().clone())
                .collect();
            if !connecting.is_empty() {
                trace!(node = %stop.id, ferries = ?ferries, "ferry terminal with transit");
                result.is_major = true;
                result.rule = MajorStopRule::FerryWithTransit;
                result.qualifying_routes = ferries.into_iter().chain(connecting).collect();
                result.qualifying_routes.sort();
                return result;
            }
        }

        // Test 3: intersection of two or more frequent routes.
        // Phase one filters to routes meeting the threshold in both peaks
        // independently; phase two counts distinct corridors among them.
        let eligible = self.eligible_routes(&routes);
        if eligible.len() >= 2 {
            let (corridors, pairs) = collapse_overlaps(&eligible);
            result.overlapping_pairs = pairs;
            if corridors >= 2 {
                trace!(node = %stop.id, corridors, "major route intersection");
                result.is_major = true;
                result.rule = MajorStopRule::MajorRouteIntersection;
                result.qualifying_routes =
                    eligible.iter().map(|(r, _)| r.name().clone()).collect();
                result.peak_evidence = eligible.into_iter().map(|(_, e)| e).collect();
                return result;
            }
        }

        result
    }

    /// Filter serving routes to those frequent enough in both peaks.
    ///
    /// A route must meet the threshold in the morning peak and in the
    /// afternoon peak independently; one frequent peak alone is not enough.
    fn eligible_routes<'r>(&self, routes: &[&'r Route]) -> Vec<(&'r Route, PeakHeadways)> {
        let threshold = self.config.headway_threshold();
        routes
            .iter()
            .filter_map(|route| {
                let am = route.resolve_headway(&self.config.morning_peak)?;
                let pm = route.resolve_headway(&self.config.afternoon_peak)?;
                if am <= threshold && pm <= threshold {
                    Some((
                        *route,
                        PeakHeadways {
                            route: route.name().clone(),
                            am_headway_minutes: am,
                            pm_headway_minutes: pm,
                        },
                    ))
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Count distinct corridors among eligible routes.
///
/// Two routes whose stop patterns fully contain one another (a short-turn
/// variant, or the two halves of a loop) serve the same places, so they
/// collapse into one corridor. Returns the corridor count and the collapsed
/// pairs for the analyst report.
fn collapse_overlaps(
    eligible: &[(&Route, PeakHeadways)],
) -> (usize, Vec<(RouteName, RouteName)>) {
    let n = eligible.len();
    let mut group: Vec<usize> = (0..n).collect();

    fn find(group: &mut Vec<usize>, i: usize) -> usize {
        if group[i] != i {
            let root = find(group, group[i]);
            group[i] = root;
        }
        group[i]
    }

    let mut pairs = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let (a, _) = eligible[i];
            let (b, _) = eligible[j];
            if a.stops_within(b) || b.stops_within(a) {
                pairs.push((a.name().clone(), b.name().clone()));
                let (ra, rb) = (find(&mut group, i), find(&mut group, j));
                if ra != rb {
                    group[ra] = rb;
                }
            }
        }
    }

    let mut roots: Vec<usize> = (0..n).map(|i| find(&mut group, i)).collect();
    roots.sort_unstable();
    roots.dedup();
    (roots.len(), pairs)
}
