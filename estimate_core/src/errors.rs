//! # Error Types
//!
//! Structured error types for estimate_core. Validation failures are
//! returned as [`CalcError`] and stop the calculator invocation. Gaps in
//! company configuration (missing carrier speed, missing capacity, no rate
//! template) are not errors: the engine applies a documented fallback and
//! records a [`FallbackWarning`] so the caller can surface it.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length_m: f64) -> CalcResult<()> {
//!     if length_m <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "length_m".to_string(),
//!             value: length_m.to_string(),
//!             reason: "Length must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rates::MaterialType;

/// Result type alias for estimate_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for estimation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (non-positive, non-numeric, not finite)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// An enumerated option is not one of the accepted literals
    #[error("Unknown option for '{field}': {value}")]
    UnknownOption { field: String, value: String },

    /// Company configuration could not be read
    #[error("Configuration error: '{path}' - {reason}")]
    ConfigError { path: String, reason: String },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an UnknownOption error
    pub fn unknown_option(field: impl Into<String>, value: impl Into<String>) -> Self {
        CalcError::UnknownOption {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a ConfigError
    pub fn config_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ConfigError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Validation errors are the caller's to fix; they never succeed on retry
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. } | CalcError::MissingField { .. } | CalcError::UnknownOption { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::UnknownOption { .. } => "UNKNOWN_OPTION",
            CalcError::ConfigError { .. } => "CONFIG_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl CalcError {
    /// Map a deserializer message back onto the validation variant it came from.
    ///
    /// Option enums deserialize through `from_str_flexible`, so their failures
    /// arrive here as the [`CalcError::UnknownOption`] display text.
    fn from_deserialize_message(message: &str) -> Self {
        if let Some((field, _)) = message.strip_prefix("missing field `").and_then(|rest| rest.split_once('`')) {
            return CalcError::missing_field(field);
        }
        if let Some((field, value)) = message
            .strip_prefix("Unknown option for '")
            .and_then(|rest| rest.split_once("': "))
        {
            return CalcError::unknown_option(field, value);
        }
        // only the calculation tag is a derived enum on the input side
        if let Some((value, _)) = message.strip_prefix("unknown variant `").and_then(|rest| rest.split_once('`')) {
            return CalcError::unknown_option("type", value);
        }
        CalcError::serialization(message)
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        let full = err.to_string();
        let message = match full.rsplit_once(" at line ") {
            Some((head, _)) if err.line() > 0 => head,
            _ => full.as_str(),
        };
        CalcError::from_deserialize_message(message)
    }
}

impl From<toml::de::Error> for CalcError {
    fn from(err: toml::de::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

/// A configuration gap the engine recovered from.
///
/// Carried in [`Estimate::warnings`](crate::breakdown::Estimate) so the
/// caller can show that part of the estimate rests on a built-in constant
/// rather than company data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackWarning {
    /// No carrier with this size class; default speed was used
    DefaultCarrierSpeed { size_class: f64, speed_m_per_hour: f64 },

    /// No capacity for this (material, carrier) pair; caller fallback was used
    MissingCapacity {
        material: MaterialType,
        size_class: f64,
        fallback_capacity: f64,
    },

    /// No rate template for the digging method; fixed multiplier was used
    FixedDiggingMultiplier { task: String, multiplier: f64 },

    /// No rate template for a labor task; built-in hours per unit were used
    FallbackLaborRate { task: String, hours_per_unit: f64 },
}

impl std::fmt::Display for FallbackWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackWarning::DefaultCarrierSpeed { size_class, speed_m_per_hour } => write!(
                f,
                "no carrier speed for size class {}; using default {} m/h",
                size_class, speed_m_per_hour
            ),
            FallbackWarning::MissingCapacity {
                material,
                size_class,
                fallback_capacity,
            } => write!(
                f,
                "no {} capacity for carrier size class {}; using {} {} per trip",
                material,
                size_class,
                fallback_capacity,
                material.unit()
            ),
            FallbackWarning::FixedDiggingMultiplier { task, multiplier } => {
                write!(f, "no rate template for '{}'; using fixed multiplier {}", task, multiplier)
            }
            FallbackWarning::FallbackLaborRate { task, hours_per_unit } => {
                write!(f, "no rate template for '{}'; using {} h per unit", task, hours_per_unit)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("length_m", "-5", "Length must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::unknown_option("soil_type", "peat").error_code(), "UNKNOWN_OPTION");
        assert_eq!(CalcError::config_error("rates.toml", "missing").error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_validation_classification() {
        assert!(CalcError::invalid_input("depth_cm", "0", "zero").is_validation());
        assert!(!CalcError::serialization("bad json").is_validation());
    }

    #[test]
    fn test_json_errors_keep_their_field() {
        let err = CalcError::from(serde_json::from_str::<MaterialType>("\"glass\"").unwrap_err());
        assert_eq!(err, CalcError::unknown_option("material", "glass"));

        let missing = serde_json::from_str::<crate::transport::TransportOptions>(r#"{"carrier_size_class": 1.0}"#);
        let err = CalcError::from(missing.unwrap_err());
        assert_eq!(err, CalcError::missing_field("one_way_distance_m"));
        assert_eq!(err.error_code(), "MISSING_FIELD");

        let err = CalcError::from(serde_json::from_str::<MaterialType>("{").unwrap_err());
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        assert!(!err.is_validation());
    }

    #[test]
    fn test_warning_display() {
        let warning = FallbackWarning::MissingCapacity {
            material: MaterialType::Sand,
            size_class: 1.0,
            fallback_capacity: 0.5,
        };
        assert_eq!(
            warning.to_string(),
            "no sand capacity for carrier size class 1; using 0.5 t per trip"
        );
    }
}
