//! Major-stop qualification per PRC §21064.3.
//!
//! A stop node is a major transit stop when it is a rail or BRT station, a
//! ferry terminal with connecting bus or rail service, or the intersection
//! of two or more routes running every 15 minutes or less through both peak
//! commute periods. This module applies those tests to a frozen scenario
//! snapshot and reports every stop node's outcome.

mod config;
mod engine;

pub use config::{
    ClassifierConfig, DEFAULT_AFTERNOON_PEAK, DEFAULT_MAJOR_HEADWAY_THRESHOLD_MINS,
    DEFAULT_MORNING_PEAK,
};
pub use engine::Classifier;

use tracing::{info, warn};

use crate::domain::{ClassifyError, ClassifyResult};
use crate::report::Classification;
use crate::scenario::ScenarioInput;
use crate::schedule::{Schedule, StopIndex};

/// Resource-safety bound on total input records. A regional scenario is a
/// few thousand records; anything near this limit is malformed input.
pub const MAX_SCENARIO_RECORDS: usize = 2_000_000;

/// Run the full classification pipeline over one scenario.
///
/// Builds the schedule and stop index, applies the qualification tests and
/// returns the per-node results with the collected data issues. An empty
/// scenario is valid input and yields an empty result set.
///
/// # Errors
///
/// Fails when the scenario exceeds [`MAX_SCENARIO_RECORDS`], or in strict
/// mode when the scenario has any structural issue.
pub fn classify_scenario(
    input: &ScenarioInput,
    config: &ClassifierConfig,
) -> ClassifyResult<Classification> {
    let records = input.record_count();
    if records > MAX_SCENARIO_RECORDS {
        return Err(ClassifyError::ScenarioTooLarge {
            records,
            limit: MAX_SCENARIO_RECORDS,
        });
    }

    let (schedule, mut issues) = Schedule::build(input, config);
    let (index, index_issues) = StopIndex::build(input, &schedule);
    issues.extend(index_issues);

    if config.strict {
        if let Some(first) = issues.first() {
            return Err(ClassifyError::Strict(first.clone()));
        }
    }
    for issue in &issues {
        warn!(%issue, "scenario data issue");
    }
    if schedule.is_empty() && issues.is_empty() {
        warn!("scenario contains no routes");
    }

    let results = Classifier::new(&schedule, &index, config).classify();
    info!(
        routes = schedule.len(),
        stops = results.len(),
        major = results.iter().filter(|r| r.is_major).count(),
        issues = issues.len(),
        "scenario classified"
    );

    Ok(Classification { results, issues })
}
