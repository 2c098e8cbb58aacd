//! Carrier speeds by size class
//!
//! A carrier (wheelbarrow, dumper) is identified by its nominal payload in
//! tonnes. Speed lookups are exact on the size class; anything else falls
//! back to [`DEFAULT_CARRIER_SPEED_M_PER_HOUR`].

use serde::{Deserialize, Serialize};

use crate::errors::FallbackWarning;

/// Speed used when a carrier size class is not configured (m/h)
pub const DEFAULT_CARRIER_SPEED_M_PER_HOUR: f64 = 4000.0;

/// Tolerance for comparing size classes parsed from config files
pub(crate) const SIZE_CLASS_EPSILON: f64 = 1e-9;

/// Travel speed for one carrier size class.
///
/// ## JSON Example
///
/// ```json
/// { "size_class": 1.0, "speed_m_per_hour": 5000.0, "name": "1t dumper" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierSpec {
    /// Nominal payload in tonnes
    pub size_class: f64,

    /// Average travel speed in metres per hour
    pub speed_m_per_hour: f64,

    /// Display name (e.g. "Wheelbarrow")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CarrierSpec {
    pub fn new(size_class: f64, speed_m_per_hour: f64) -> Self {
        CarrierSpec {
            size_class,
            speed_m_per_hour,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Label for output, e.g. "1t dumper" or "2.5t carrier"
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{}t carrier", self.size_class),
        }
    }

    pub(crate) fn matches(&self, size_class: f64) -> bool {
        (self.size_class - size_class).abs() < SIZE_CLASS_EPSILON
    }
}

/// Find a configured carrier by exact size class
pub fn find_carrier(carriers: &[CarrierSpec], size_class: f64) -> Option<&CarrierSpec> {
    carriers.iter().find(|c| c.matches(size_class))
}

/// Speed for a size class, reporting when the default was used.
///
/// A configured speed that is not a positive finite number counts as
/// missing.
pub fn speed_for(carriers: &[CarrierSpec], size_class: f64) -> (f64, Option<FallbackWarning>) {
    match find_carrier(carriers, size_class) {
        Some(spec) if spec.speed_m_per_hour.is_finite() && spec.speed_m_per_hour > 0.0 => {
            (spec.speed_m_per_hour, None)
        }
        _ => (
            DEFAULT_CARRIER_SPEED_M_PER_HOUR,
            Some(FallbackWarning::DefaultCarrierSpeed {
                size_class,
                speed_m_per_hour: DEFAULT_CARRIER_SPEED_M_PER_HOUR,
            }),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carriers() -> Vec<CarrierSpec> {
        vec![
            CarrierSpec::new(0.1, 3000.0).with_name("Wheelbarrow"),
            CarrierSpec::new(1.0, 5000.0),
            CarrierSpec::new(3.0, 0.0),
        ]
    }

    #[test]
    fn test_exact_match() {
        let (speed, warning) = speed_for(&carriers(), 1.0);
        assert_eq!(speed, 5000.0);
        assert!(warning.is_none());
    }

    #[test]
    fn test_missing_size_class_uses_default() {
        let (speed, warning) = speed_for(&carriers(), 2.0);
        assert_eq!(speed, DEFAULT_CARRIER_SPEED_M_PER_HOUR);
        assert!(matches!(
            warning,
            Some(FallbackWarning::DefaultCarrierSpeed { size_class, .. }) if size_class == 2.0
        ));
    }

    #[test]
    fn test_zero_speed_counts_as_missing() {
        let (speed, warning) = speed_for(&carriers(), 3.0);
        assert_eq!(speed, DEFAULT_CARRIER_SPEED_M_PER_HOUR);
        assert!(warning.is_some());
    }

    #[test]
    fn test_display_name() {
        let list = carriers();
        assert_eq!(list[0].display_name(), "Wheelbarrow");
        assert_eq!(list[1].display_name(), "1t carrier");
    }
}
