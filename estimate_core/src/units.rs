//! # Unit Types
//!
//! Type-safe wrappers for the metric units used on site. These are thin
//! `f64` newtypes that serialize as bare numbers.
//!
//! ## Units
//!
//! - Length: metres (m), centimetres (cm)
//! - Volume: cubic metres (m³)
//! - Mass: tonnes (t), kilograms (kg)
//! - Time: hours (h)
//!
//! Raw user measurements arrive as [`Measure`], which accepts a JSON number
//! or a decimal string and is validated into a strictly positive `f64`.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::units::{Centimeters, Meters, Measure};
//!
//! let depth = Centimeters(60.0);
//! let depth_m: Meters = depth.into();
//! assert_eq!(depth_m.0, 0.6);
//!
//! let raw = Measure::from("15.0");
//! assert_eq!(raw.positive("length_m").unwrap(), 15.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul};

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in centimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

impl From<Centimeters> for Meters {
    fn from(cm: Centimeters) -> Self {
        Meters(cm.0 / 100.0)
    }
}

impl From<Meters> for Centimeters {
    fn from(m: Meters) -> Self {
        Centimeters(m.0 * 100.0)
    }
}

// ============================================================================
// Volume Units
// ============================================================================

/// Volume in cubic metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMeters(pub f64);

impl CubicMeters {
    /// Box volume from three lengths
    pub fn of_box(length: Meters, width: Meters, depth: Meters) -> Self {
        CubicMeters(length.0 * width.0 * depth.0)
    }

    /// Mass of this volume at a density in t/m³
    pub fn mass_at(self, density_t_per_m3: f64) -> Tonnes {
        Tonnes(self.0 * density_t_per_m3)
    }
}

// ============================================================================
// Mass Units
// ============================================================================

/// Mass in tonnes
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tonnes(pub f64);

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

impl From<Kilograms> for Tonnes {
    fn from(kg: Kilograms) -> Self {
        Tonnes(kg.0 / 1000.0)
    }
}

impl From<Tonnes> for Kilograms {
    fn from(t: Tonnes) -> Self {
        Kilograms(t.0 * 1000.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Centimeters);
impl_arithmetic!(CubicMeters);
impl_arithmetic!(Tonnes);
impl_arithmetic!(Kilograms);

// ============================================================================
// Raw Measurements
// ============================================================================

/// A raw user measurement: a JSON number or a decimal string.
///
/// Form inputs often arrive as strings (`"15.5"`); API callers send numbers.
/// Both are accepted and validated the same way by [`Measure::positive`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Measure {
    Number(f64),
    Text(String),
}

impl Measure {
    /// Parse into an `f64` without range checks
    pub fn parse(&self, field: &str) -> CalcResult<f64> {
        match self {
            Measure::Number(n) => Ok(*n),
            Measure::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                CalcError::invalid_input(field, s.clone(), "Value is not a number")
            }),
        }
    }

    /// Parse and require a finite value strictly greater than zero
    pub fn positive(&self, field: &str) -> CalcResult<f64> {
        let value = self.parse(field)?;
        if !value.is_finite() {
            return Err(CalcError::invalid_input(field, value.to_string(), "Value must be finite"));
        }
        if value <= 0.0 {
            return Err(CalcError::invalid_input(
                field,
                value.to_string(),
                "Value must be greater than zero",
            ));
        }
        Ok(value)
    }
}

impl From<f64> for Measure {
    fn from(value: f64) -> Self {
        Measure::Number(value)
    }
}

impl From<&str> for Measure {
    fn from(value: &str) -> Self {
        Measure::Text(value.to_string())
    }
}

// ============================================================================
// Numeric helpers
// ============================================================================

/// Round to two decimals for display. Calculations keep full precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Division that yields `None` for a zero, negative-zero or non-finite denominator
pub fn checked_div(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }
    let quotient = numerator / denominator;
    quotient.is_finite().then_some(quotient)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cm_to_m() {
        let cm = Centimeters(60.0);
        let m: Meters = cm.into();
        assert!((m.0 - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_kg_to_tonnes() {
        let kg = Kilograms(1600.0);
        let t: Tonnes = kg.into();
        assert_eq!(t.0, 1.6);
    }

    #[test]
    fn test_box_volume_and_mass() {
        let v = CubicMeters::of_box(Meters(15.0), Meters(0.6), Meters(0.6));
        assert!((v.0 - 5.4).abs() < 1e-9);
        assert!((v.mass_at(1.5).0 - 8.1).abs() < 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let a = CubicMeters(10.0);
        let b = CubicMeters(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_measure_accepts_numbers_and_strings() {
        let from_json: Measure = serde_json::from_str("12.5").unwrap();
        assert_eq!(from_json.positive("x").unwrap(), 12.5);

        let from_text: Measure = serde_json::from_str("\" 0.45 \"").unwrap();
        assert_eq!(from_text.positive("x").unwrap(), 0.45);
    }

    #[test]
    fn test_measure_rejects_bad_values() {
        let err = Measure::from("abc").positive("width_cm").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.to_string().contains("width_cm"));

        assert!(Measure::from(0.0).positive("depth_cm").is_err());
        assert!(Measure::from(-3.0).positive("depth_cm").is_err());
        assert!(Measure::from(f64::NAN).positive("depth_cm").is_err());
        assert!(Measure::from("inf").positive("depth_cm").is_err());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.235_1), 1.24);
        assert_eq!(round2(12.0), 12.0);
    }

    #[test]
    fn test_checked_div() {
        assert_eq!(checked_div(1.0, 0.0), None);
        assert_eq!(checked_div(1.0, -0.0), None);
        assert_eq!(checked_div(1.0, f64::INFINITY), None);
        assert_eq!(checked_div(6.0, 3.0), Some(2.0));
    }
}
