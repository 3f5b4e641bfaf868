//! Schedule Model: immutable routes built from scenario records.
//!
//! Raw line records are validated and consolidated here. The two coded
//! directions of a route merge into one [`Route`]; malformed records are
//! excluded and reported, and the rest of the batch continues. Once built,
//! routes are never mutated; a future-year scenario is a frozen snapshot.

mod stop_index;

pub use stop_index::{Serving, StopIndex, StopNode};

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::classifier::ClassifierConfig;
use crate::domain::{DataIssue, NodeId, RouteName, ServiceType, TimeWindow, parse_hhmm};
use crate::scenario::{LineRecord, ScenarioInput};

/// A validated service frequency for one time period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyEntry {
    pub window: TimeWindow,
    pub headway_minutes: f64,
}

/// An immutable route: one transit service, both directions consolidated.
#[derive(Debug, Clone)]
pub struct Route {
    name: RouteName,
    service_type: ServiceType,
    stops: Vec<NodeId>,
    frequencies: Vec<FrequencyEntry>,
}

impl Route {
    /// The direction-independent route name.
    pub fn name(&self) -> &RouteName {
        &self.name
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    /// Ordered stop sequence, first occurrence order across both directions.
    pub fn stops(&self) -> &[NodeId] {
        &self.stops
    }

    /// Position of a node in the stop sequence, if the route stops there.
    pub fn stop_position(&self, node: NodeId) -> Option<usize> {
        self.stops.iter().position(|&n| n == node)
    }

    /// True if every stop of this route is also a stop of `other`.
    ///
    /// Used to detect sub-pattern routes (short-turn variants, loop
    /// directions) that do not provide genuinely distinct service.
    pub fn stops_within(&self, other: &Route) -> bool {
        let other_stops: BTreeSet<NodeId> = other.stops.iter().copied().collect();
        self.stops.iter().all(|n| other_stops.contains(n))
    }

    /// Resolve the headway applicable to a peak window.
    ///
    /// Takes the minimum headway over all frequency entries whose period
    /// intersects the window: the statute asks whether any 15-minutes-or-less
    /// service occurs during the peak, so the most favourable entry
    /// represents the route. `None` means the route does not serve the peak
    /// at all (effectively infinite headway).
    pub fn resolve_headway(&self, window: &TimeWindow) -> Option<f64> {
        self.frequencies
            .iter()
            .filter(|entry| entry.window.intersects(window))
            .map(|entry| entry.headway_minutes)
            .min_by(|a, b| a.total_cmp(b))
    }
}

/// All valid routes of a scenario, keyed by consolidated name.
#[derive(Debug, Default)]
pub struct Schedule {
    routes: BTreeMap<RouteName, Route>,
    /// Base names of records excluded as malformed. Stop-node rows for these
    /// are dropped without a second dangling-reference report.
    excluded: BTreeSet<String>,
}

impl Schedule {
    /// Build the schedule from scenario line records.
    ///
    /// Returns the schedule plus all structural issues found. Records with
    /// issues are excluded; the batch never aborts here.
    pub fn build(input: &ScenarioInput, config: &ClassifierConfig) -> (Self, Vec<DataIssue>) {
        let mut schedule = Schedule::default();
        let mut issues = Vec::new();

        // Ordered stop sequence per raw line name, from the node rows.
        let mut stops_by_line: BTreeMap<&str, Vec<NodeId>> = BTreeMap::new();
        for record in &input.stop_nodes {
            if record.is_stop {
                stops_by_line
                    .entry(record.line.as_str())
                    .or_default()
                    .push(NodeId(record.node));
            }
        }

        for line in &input.lines {
            match build_route(line, &stops_by_line, config) {
                Ok(route) => schedule.insert(route, &mut issues),
                Err(issue) => {
                    if let Ok(name) = RouteName::parse(&line.name) {
                        schedule.excluded.insert(name.as_str().to_string());
                    }
                    issues.push(issue);
                }
            }
        }

        debug!(
            routes = schedule.routes.len(),
            excluded = schedule.excluded.len(),
            issues = issues.len(),
            "schedule built"
        );
        (schedule, issues)
    }

    /// Merge a validated directional record into the consolidated route set.
    fn insert(&mut self, route: Route, issues: &mut Vec<DataIssue>) {
        match self.routes.get_mut(&route.name) {
            None => {
                self.routes.insert(route.name.clone(), route);
            }
            Some(existing) => {
                if existing.service_type != route.service_type {
                    issues.push(DataIssue::MalformedRoute {
                        route: route.name.as_str().to_string(),
                        reason: format!(
                            "directions disagree on service type ({} vs {})",
                            existing.service_type, route.service_type
                        ),
                    });
                    return;
                }
                for node in route.stops {
                    if existing.stop_position(node).is_none() {
                        existing.stops.push(node);
                    }
                }
                // Headway resolution takes the minimum over entries, so the
                // per-record no-overlap invariant need not hold across the
                // merged pair.
                existing.frequencies.extend(route.frequencies);
            }
        }
    }

    /// Look up a route by consolidated name.
    pub fn get(&self, name: &RouteName) -> Option<&Route> {
        self.routes.get(name)
    }

    /// True if the base name belongs to a record excluded as malformed.
    pub fn is_excluded(&self, base_name: &str) -> bool {
        self.excluded.contains(base_name)
    }

    /// All routes, in name order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Validate one line record into a single-direction route.
fn build_route(
    line: &LineRecord,
    stops_by_line: &BTreeMap<&str, Vec<NodeId>>,
    config: &ClassifierConfig,
) -> Result<Route, DataIssue> {
    let malformed = |reason: String| DataIssue::MalformedRoute {
        route: line.name.clone(),
        reason,
    };

    let name = RouteName::parse(&line.name)
        .map_err(|e| malformed(e.to_string()))?;

    let service_type = config
        .resolve_service_type(&name, &line.mode)
        .ok_or_else(|| malformed(format!("unrecognised service-type code {:?}", line.mode)))?;

    let mut frequencies = Vec::with_capacity(line.frequencies.len());
    for record in &line.frequencies {
        if !(record.headway_minutes > 0.0) || !record.headway_minutes.is_finite() {
            return Err(malformed(format!(
                "headway must be positive, got {}",
                record.headway_minutes
            )));
        }
        let start = parse_hhmm(&record.start)
            .map_err(|e| malformed(format!("bad period start {:?}: {e}", record.start)))?;
        let end = parse_hhmm(&record.end)
            .map_err(|e| malformed(format!("bad period end {:?}: {e}", record.end)))?;
        let window = TimeWindow::new(start, end)
            .map_err(|e| malformed(format!("bad period {}-{}: {e}", record.start, record.end)))?;
        frequencies.push(FrequencyEntry {
            window,
            headway_minutes: record.headway_minutes,
        });
    }

    // Service periods within one record must not overlap.
    let mut sorted = frequencies.clone();
    sorted.sort_by_key(|entry| entry.window.start());
    for pair in sorted.windows(2) {
        if pair[0].window.intersects(&pair[1].window) {
            return Err(malformed(format!(
                "overlapping service periods {} and {}",
                pair[0].window, pair[1].window
            )));
        }
    }

    let raw_stops = stops_by_line
        .get(line.name.as_str())
        .map(Vec::as_slice)
        .unwrap_or_default();
    if raw_stops.is_empty() {
        return Err(malformed("zero stop nodes".to_string()));
    }
    let mut stops = Vec::with_capacity(raw_stops.len());
    for &node in raw_stops {
        if !stops.contains(&node) {
            stops.push(node);
        }
    }

    Ok(Route {
        name,
        service_type,
        stops,
        frequencies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{FrequencyRecord, StopNodeRecord};

    fn freq(start: &str, end: &str, headway: f64) -> FrequencyRecord {
        FrequencyRecord {
            start: start.into(),
            end: end.into(),
            headway_minutes: headway,
        }
    }

    fn line(name: &str, mode: &str, frequencies: Vec<FrequencyRecord>) -> LineRecord {
        LineRecord {
            name: name.into(),
            mode: mode.into(),
            frequencies,
        }
    }

    fn stop(line: &str, node: u32) -> StopNodeRecord {
        StopNodeRecord {
            line: line.into(),
            node,
            x: 0.0,
            y: 0.0,
            is_stop: true,
        }
    }

    fn build(input: &ScenarioInput) -> (Schedule, Vec<DataIssue>) {
        Schedule::build(input, &ClassifierConfig::default())
    }

    #[test]
    fn builds_valid_route() {
        let input = ScenarioInput {
            lines: vec![line(
                "RT51_A",
                "BUS",
                vec![freq("06:00", "10:00", 12.0), freq("15:00", "19:00", 15.0)],
            )],
            stop_nodes: vec![stop("RT51_A", 1), stop("RT51_A", 2), stop("RT51_A", 3)],
        };

        let (schedule, issues) = build(&input);
        assert!(issues.is_empty());
        assert_eq!(schedule.len(), 1);

        let route = schedule.get(&RouteName::parse("RT51").unwrap()).unwrap();
        assert_eq!(route.service_type(), ServiceType::StandardBus);
        assert_eq!(route.stops(), &[NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(route.stop_position(NodeId(2)), Some(1));
    }

    #[test]
    fn merges_directional_pair() {
        let input = ScenarioInput {
            lines: vec![
                line("RT51_A", "BUS", vec![freq("06:00", "10:00", 12.0)]),
                line("RT51_B", "BUS", vec![freq("06:00", "10:00", 10.0)]),
            ],
            stop_nodes: vec![
                stop("RT51_A", 1),
                stop("RT51_A", 2),
                stop("RT51_B", 2),
                stop("RT51_B", 1),
                stop("RT51_B", 4),
            ],
        };

        let (schedule, issues) = build(&input);
        assert!(issues.is_empty());
        assert_eq!(schedule.len(), 1);

        let route = schedule.get(&RouteName::parse("RT51").unwrap()).unwrap();
        // Union of both directions, first-appearance order
        assert_eq!(route.stops(), &[NodeId(1), NodeId(2), NodeId(4)]);
        // Minimum headway across the pair
        let am = TimeWindow::parse("06:00", "10:00").unwrap();
        assert_eq!(route.resolve_headway(&am), Some(10.0));
    }

    #[test]
    fn resolve_headway_picks_most_frequent_intersecting_entry() {
        let input = ScenarioInput {
            lines: vec![line(
                "RT1",
                "BUS",
                vec![
                    freq("05:00", "07:00", 30.0),
                    freq("07:00", "09:00", 10.0),
                    freq("09:00", "12:00", 20.0),
                ],
            )],
            stop_nodes: vec![stop("RT1", 1), stop("RT1", 2)],
        };

        let (schedule, issues) = build(&input);
        assert!(issues.is_empty());
        let route = schedule.get(&RouteName::parse("RT1").unwrap()).unwrap();

        let am = TimeWindow::parse("06:00", "10:00").unwrap();
        assert_eq!(route.resolve_headway(&am), Some(10.0));

        // No entry intersects the afternoon peak: not served
        let pm = TimeWindow::parse("15:00", "19:00").unwrap();
        assert_eq!(route.resolve_headway(&pm), None);
    }

    #[test]
    fn zero_stops_is_malformed() {
        let input = ScenarioInput {
            lines: vec![line("RT1", "BUS", vec![freq("06:00", "10:00", 10.0)])],
            stop_nodes: vec![],
        };

        let (schedule, issues) = build(&input);
        assert!(schedule.is_empty());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].to_string().contains("zero stop nodes"));
        assert!(schedule.is_excluded("RT1"));
    }

    #[test]
    fn pass_through_nodes_do_not_count_as_stops() {
        let input = ScenarioInput {
            lines: vec![line("RT1", "BUS", vec![freq("06:00", "10:00", 10.0)])],
            stop_nodes: vec![
                stop("RT1", 1),
                StopNodeRecord {
                    is_stop: false,
                    ..stop("RT1", 2)
                },
                stop("RT1", 3),
            ],
        };

        let (schedule, issues) = build(&input);
        assert!(issues.is_empty());
        let route = schedule.get(&RouteName::parse("RT1").unwrap()).unwrap();
        assert_eq!(route.stops(), &[NodeId(1), NodeId(3)]);
    }

    #[test]
    fn non_positive_headway_is_malformed() {
        for headway in [0.0, -5.0, f64::NAN] {
            let input = ScenarioInput {
                lines: vec![line("RT1", "BUS", vec![freq("06:00", "10:00", headway)])],
                stop_nodes: vec![stop("RT1", 1)],
            };
            let (schedule, issues) = build(&input);
            assert!(schedule.is_empty(), "headway {headway} accepted");
            assert_eq!(issues.len(), 1);
            assert!(issues[0].to_string().contains("headway must be positive"));
        }
    }

    #[test]
    fn unrecognised_mode_is_malformed() {
        let input = ScenarioInput {
            lines: vec![line("RT1", "GONDOLA", vec![freq("06:00", "10:00", 10.0)])],
            stop_nodes: vec![stop("RT1", 1)],
        };

        let (_, issues) = build(&input);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].to_string().contains("unrecognised service-type"));
    }

    #[test]
    fn overlapping_periods_within_record_are_malformed() {
        let input = ScenarioInput {
            lines: vec![line(
                "RT1",
                "BUS",
                vec![freq("06:00", "10:00", 10.0), freq("09:00", "12:00", 20.0)],
            )],
            stop_nodes: vec![stop("RT1", 1)],
        };

        let (_, issues) = build(&input);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].to_string().contains("overlapping service periods"));
    }

    #[test]
    fn malformed_time_string_is_malformed_route() {
        let input = ScenarioInput {
            lines: vec![line("RT1", "BUS", vec![freq("6am", "10:00", 10.0)])],
            stop_nodes: vec![stop("RT1", 1)],
        };

        let (_, issues) = build(&input);
        assert_eq!(issues.len(), 1);
        assert!(matches!(&issues[0], DataIssue::MalformedRoute { route, .. } if route == "RT1"));
    }

    #[test]
    fn one_bad_record_does_not_sink_the_batch() {
        let input = ScenarioInput {
            lines: vec![
                line("BAD", "BUS", vec![freq("06:00", "10:00", 0.0)]),
                line("GOOD", "BUS", vec![freq("06:00", "10:00", 10.0)]),
            ],
            stop_nodes: vec![stop("BAD", 1), stop("GOOD", 2)],
        };

        let (schedule, issues) = build(&input);
        assert_eq!(schedule.len(), 1);
        assert_eq!(issues.len(), 1);
        assert!(schedule.get(&RouteName::parse("GOOD").unwrap()).is_some());
    }

    #[test]
    fn stops_within_detects_sub_patterns() {
        let input = ScenarioInput {
            lines: vec![
                line("LONG", "BUS", vec![freq("06:00", "10:00", 10.0)]),
                line("SHORT", "BUS", vec![freq("06:00", "10:00", 10.0)]),
                line("OTHER", "BUS", vec![freq("06:00", "10:00", 10.0)]),
            ],
            stop_nodes: vec![
                stop("LONG", 1),
                stop("LONG", 2),
                stop("LONG", 3),
                stop("LONG", 4),
                stop("SHORT", 2),
                stop("SHORT", 3),
                stop("OTHER", 3),
                stop("OTHER", 9),
            ],
        };

        let (schedule, _) = build(&input);
        let long = schedule.get(&RouteName::parse("LONG").unwrap()).unwrap();
        let short = schedule.get(&RouteName::parse("SHORT").unwrap()).unwrap();
        let other = schedule.get(&RouteName::parse("OTHER").unwrap()).unwrap();

        assert!(short.stops_within(long));
        assert!(!long.stops_within(short));
        assert!(!other.stops_within(long));
        assert!(!long.stops_within(other));
    }
}
