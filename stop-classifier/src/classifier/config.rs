//! Configuration for the qualification engine.

use crate::domain::{RouteName, ServiceType, TimeWindow};
use std::collections::{BTreeMap, BTreeSet};

/// Default morning peak commute window, half-open.
pub const DEFAULT_MORNING_PEAK: (&str, &str) = ("06:00", "10:00");

/// Default afternoon peak commute window, half-open.
pub const DEFAULT_AFTERNOON_PEAK: (&str, &str) = ("15:00", "19:00");

/// Default qualifying headway threshold in minutes, inclusive.
///
/// PRC §21064.3 asks for "15 minutes or less" during peak commute periods.
pub const DEFAULT_MAJOR_HEADWAY_THRESHOLD_MINS: u32 = 15;

/// Configuration parameters for major-stop classification.
///
/// Peak window clock boundaries are agency discretion under the statute, so
/// they are configuration with explicit named defaults, never inline magic
/// values.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Morning peak commute period.
    pub morning_peak: TimeWindow,

    /// Afternoon peak commute period.
    pub afternoon_peak: TimeWindow,

    /// Maximum qualifying headway in minutes (inclusive) for the
    /// major-route-intersection test.
    pub major_headway_threshold_mins: u32,

    /// Mapping from raw line-file mode codes to service types.
    /// A line whose code is absent here is a malformed route.
    pub service_type_map: BTreeMap<String, ServiceType>,

    /// Route base names forced to rail regardless of their coded mode.
    /// Covers intercity rail coded as express bus in the planning model.
    pub rail_overrides: BTreeSet<String>,

    /// When true, the first structural data issue aborts the run instead of
    /// being collected into the batch report.
    pub strict: bool,
}

impl ClassifierConfig {
    /// The default mode-code mapping.
    ///
    /// Agencies with numeric mode codes supply their own map; these names
    /// cover the common symbolic coding.
    pub fn default_service_type_map() -> BTreeMap<String, ServiceType> {
        [
            ("RAIL", ServiceType::Rail),
            ("LRT", ServiceType::Rail),
            ("CRT", ServiceType::Rail),
            ("BRT", ServiceType::Brt),
            ("FERRY", ServiceType::Ferry),
            ("BUS", ServiceType::StandardBus),
            ("EXP", ServiceType::StandardBus),
        ]
        .into_iter()
        .map(|(code, ty)| (code.to_string(), ty))
        .collect()
    }

    /// Resolve a raw mode code, honouring rail overrides for the given
    /// route name.
    pub fn resolve_service_type(&self, name: &RouteName, mode: &str) -> Option<ServiceType> {
        if self.rail_overrides.contains(name.as_str()) {
            return Some(ServiceType::Rail);
        }
        self.service_type_map.get(mode).copied()
    }

    /// The qualifying headway threshold as minutes, for comparison against
    /// (possibly fractional) resolved headways.
    pub fn headway_threshold(&self) -> f64 {
        f64::from(self.major_headway_threshold_mins)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        let (am_start, am_end) = DEFAULT_MORNING_PEAK;
        let (pm_start, pm_end) = DEFAULT_AFTERNOON_PEAK;
        Self {
            morning_peak: TimeWindow::parse(am_start, am_end)
                .expect("default morning peak literal"),
            afternoon_peak: TimeWindow::parse(pm_start, pm_end)
                .expect("default afternoon peak literal"),
            major_headway_threshold_mins: DEFAULT_MAJOR_HEADWAY_THRESHOLD_MINS,
            service_type_map: Self::default_service_type_map(),
            rail_overrides: BTreeSet::new(),
            strict: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ClassifierConfig::default();

        assert_eq!(config.morning_peak.to_string(), "06:00-10:00");
        assert_eq!(config.afternoon_peak.to_string(), "15:00-19:00");
        assert_eq!(config.major_headway_threshold_mins, 15);
        assert!(!config.strict);
        assert!(config.rail_overrides.is_empty());
    }

    #[test]
    fn resolve_known_codes() {
        let config = ClassifierConfig::default();
        let name = RouteName::parse("RT51_A").unwrap();

        assert_eq!(
            config.resolve_service_type(&name, "BUS"),
            Some(ServiceType::StandardBus)
        );
        assert_eq!(
            config.resolve_service_type(&name, "LRT"),
            Some(ServiceType::Rail)
        );
        assert_eq!(config.resolve_service_type(&name, "TRAM"), None);
    }

    #[test]
    fn rail_override_beats_mode_code() {
        let mut config = ClassifierConfig::default();
        config.rail_overrides.insert("AMTRCC".into());

        // Coded as express bus, but it is intercity rail
        let amtrak = RouteName::parse("AMTRCC_A").unwrap();
        assert_eq!(
            config.resolve_service_type(&amtrak, "EXP"),
            Some(ServiceType::Rail)
        );

        // Other routes are unaffected
        let bus = RouteName::parse("RT51_A").unwrap();
        assert_eq!(
            config.resolve_service_type(&bus, "EXP"),
            Some(ServiceType::StandardBus)
        );
    }

    #[test]
    fn custom_peak_windows() {
        let config = ClassifierConfig {
            morning_peak: TimeWindow::parse("05:00", "09:00").unwrap(),
            afternoon_peak: TimeWindow::parse("16:00", "20:00").unwrap(),
            ..ClassifierConfig::default()
        };

        assert_eq!(config.morning_peak.duration_minutes(), 240);
        assert_eq!(config.afternoon_peak.to_string(), "16:00-20:00");
    }
}
