//! Domain types for the major transit stop classifier.
//!
//! This module contains the core value types representing validated
//! scenario data. All types enforce their invariants at construction time,
//! so code that receives these types can trust their validity.

mod error;
mod node;
mod route;
mod time;

pub use error::{ClassifyError, ClassifyResult, DataIssue};
pub use node::{NodeId, Position};
pub use route::{InvalidRouteName, RouteName, ServiceType};
pub use time::{TimeError, TimeWindow, parse_hhmm};
