use std::path::PathBuf;
use std::process::ExitCode;

use stop_classifier::classifier::{ClassifierConfig, classify_scenario};
use stop_classifier::scenario::ScenarioInput;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(scenario_path) = args.next().map(PathBuf::from) else {
        eprintln!("Usage: stop-classifier <scenario.json> [results.json]");
        return ExitCode::FAILURE;
    };
    let output_path = args.next().map(PathBuf::from);

    // Unreadable or unparseable input is the one fatal condition; the
    // classifier itself reports per-record issues and keeps going.
    let text = match std::fs::read_to_string(&scenario_path) {
        Ok(text) => text,
        Err(e) => {
            error!("failed to read {}: {e}", scenario_path.display());
            return ExitCode::FAILURE;
        }
    };
    let input: ScenarioInput = match serde_json::from_str(&text) {
        Ok(input) => input,
        Err(e) => {
            error!("failed to parse {}: {e}", scenario_path.display());
            return ExitCode::FAILURE;
        }
    };
    info!(
        lines = input.lines.len(),
        stop_nodes = input.stop_nodes.len(),
        "loaded scenario {}",
        scenario_path.display()
    );

    let mut config = ClassifierConfig::default();
    if std::env::var("STOP_CLASSIFIER_STRICT").is_ok_and(|v| v == "1") {
        config.strict = true;
    }

    let classification = match classify_scenario(&input, &config) {
        Ok(classification) => classification,
        Err(e) => {
            error!("classification failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    if !classification.issues.is_empty() {
        warn!(
            count = classification.issues.len(),
            "scenario has data issues; review before publishing results"
        );
    }
    info!(
        stops = classification.results.len(),
        major = classification.major_count(),
        "classification finished"
    );

    match output_path {
        Some(path) => {
            if let Err(e) = classification.write_json(&path) {
                error!("failed to write {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
            info!("results written to {}", path.display());
        }
        None => match serde_json::to_string_pretty(&classification) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("failed to serialise results: {e}");
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}
