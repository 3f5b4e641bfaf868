//! Route name and service type handling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error returned when a route name is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid route name: {reason}")]
pub struct InvalidRouteName {
    reason: &'static str,
}

/// Suffixes the planning model appends to the two directions of one route.
const DIRECTION_SUFFIXES: [&str; 2] = ["_A", "_B"];

/// A validated, direction-independent route name.
///
/// Planning line files code the two directions of a route as separate lines
/// with `_A`/`_B` suffixes (e.g. `RT51_A` and `RT51_B`). For major-stop
/// purposes those are one route, so names normalise to the base form at
/// construction.
///
/// # Examples
///
/// ```
/// use stop_classifier::domain::RouteName;
///
/// let a = RouteName::parse("RT51_A").unwrap();
/// let b = RouteName::parse("RT51_B").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "RT51");
///
/// // Names without a direction suffix pass through
/// let ferry = RouteName::parse("VALLEJOFERRY").unwrap();
/// assert_eq!(ferry.as_str(), "VALLEJOFERRY");
///
/// assert!(RouteName::parse("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RouteName(String);

impl RouteName {
    /// Parse a route name as written in the line file, stripping any
    /// direction suffix.
    pub fn parse(raw: &str) -> Result<Self, InvalidRouteName> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvalidRouteName {
                reason: "must not be empty",
            });
        }
        Ok(Self(strip_direction_suffix(trimmed).to_string()))
    }

    /// Returns the normalised name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip a trailing `_A`/`_B` direction tag, if present.
fn strip_direction_suffix(name: &str) -> &str {
    for suffix in DIRECTION_SUFFIXES {
        if let Some(base) = name.strip_suffix(suffix) {
            if !base.is_empty() {
                return base;
            }
        }
    }
    name
}

/// Service type of a transit route, per PRC §21064.3 categories.
///
/// A closed enum so the qualification rules are exhaustively checked by the
/// compiler instead of comparing raw mode strings at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    Rail,
    Brt,
    Ferry,
    StandardBus,
}

impl ServiceType {
    /// True for the service types whose stations qualify outright.
    pub fn is_rail_or_brt(self) -> bool {
        matches!(self, ServiceType::Rail | ServiceType::Brt)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceType::Rail => "rail",
            ServiceType::Brt => "BRT",
            ServiceType::Ferry => "ferry",
            ServiceType::StandardBus => "standard bus",
        };
        f.write_str(s)
    }
}
