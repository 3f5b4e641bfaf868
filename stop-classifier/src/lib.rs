//! Major transit stop classifier for planning-model scenarios.
//!
//! Ingests a future-year transit network description (routes, stop
//! sequences and service frequencies) and determines which stop nodes
//! qualify as "major transit stops" under California Public Resources Code
//! §21064.3. Downstream collaborators buffer and map the flagged stops;
//! this crate owns only the classification.

pub mod classifier;
pub mod domain;
pub mod report;
pub mod scenario;
pub mod schedule;
