//! Clock time handling for planning-model service periods.
//!
//! Planning line files give service periods as "HH:MM" strings within a
//! single representative weekday. This module provides strict parsing and a
//! half-open time window type used for frequency entries and peak periods.

use chrono::{NaiveTime, Timelike};
use std::fmt;

/// Error returned when parsing an invalid time or window.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }

    /// The human-readable reason, for embedding in data-issue reports.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

/// Parse a clock time from "HH:MM" format.
///
/// # Examples
///
/// ```
/// use stop_classifier::domain::parse_hhmm;
///
/// // Valid times
/// assert!(parse_hhmm("00:00").is_ok());
/// assert!(parse_hhmm("23:59").is_ok());
/// assert!(parse_hhmm("06:30").is_ok());
///
/// // Invalid formats
/// assert!(parse_hhmm("630").is_err());
/// assert!(parse_hhmm("6:30").is_err());
/// assert!(parse_hhmm("25:00").is_err());
/// ```
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, TimeError> {
    // Must be exactly 5 characters: HH:MM
    if s.len() != 5 {
        return Err(TimeError::new("expected HH:MM format"));
    }

    let bytes = s.as_bytes();

    if bytes[2] != b':' {
        return Err(TimeError::new("expected colon at position 2"));
    }

    let hour =
        parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
    if hour > 23 {
        return Err(TimeError::new("hour must be 0-23"));
    }

    let minute = parse_two_digits(&bytes[3..5])
        .ok_or_else(|| TimeError::new("invalid minute digits"))?;
    if minute > 59 {
        return Err(TimeError::new("minute must be 0-59"));
    }

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeError::new("invalid time"))
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

/// A half-open time window `[start, end)` within a single service day.
///
/// Used both for a route's frequency entries and for the configured peak
/// commute periods. `start < end` is enforced at construction, so windows
/// never wrap midnight; planning-model periods are blocks within one day.
///
/// # Examples
///
/// ```
/// use stop_classifier::domain::TimeWindow;
///
/// let am = TimeWindow::parse("06:00", "10:00").unwrap();
/// let early = TimeWindow::parse("05:00", "06:00").unwrap();
///
/// // Half-open: a window ending at 06:00 does not touch one starting there
/// assert!(!am.intersects(&early));
///
/// let overlap = TimeWindow::parse("09:00", "12:00").unwrap();
/// assert!(am.intersects(&overlap));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    /// Create a window from start and end times.
    ///
    /// Fails unless `start < end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, TimeError> {
        if start >= end {
            return Err(TimeError::new("window start must be before end"));
        }
        Ok(Self { start, end })
    }

    /// Parse a window from "HH:MM" start and end strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, TimeError> {
        Self::new(parse_hhmm(start)?, parse_hhmm(end)?)
    }

    /// Returns the start of the window (inclusive).
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    /// Returns the end of the window (exclusive).
    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// True if the two half-open windows share any instant.
    pub fn intersects(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True if `time` falls within the window.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time < self.end
    }

    /// The window's length in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

impl fmt::Debug for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeWindow({self})")
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start.hour(),
            self.start.minute(),
            self.end.hour(),
            self.end.minute()
        )
    }
}
