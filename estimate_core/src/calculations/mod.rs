//! # Quantity Calculators
//!
//! One calculator per task family. Each follows the pattern:
//!
//! - `*Input` - raw measurements and option selections (JSON-serializable)
//! - `*Result` - fully typed quantities, hours and transport legs
//! - `calculate(input, config) -> CalcResult<*Result>` - pure function
//!
//! Typed results convert into the common [`Estimate`] shape with `From`.
//!
//! ## Available Calculators
//!
//! - [`excavation`] - foundation trench excavation
//! - [`kerbs`] - kerbs, edges and setts on a mortar bed
//! - [`mortar`] - mortar volume and its cement/sand mix
//! - [`haulage`] - moving any material category

pub mod excavation;
pub mod haulage;
pub mod kerbs;
pub mod mortar;

use serde::{Deserialize, Serialize};

pub use excavation::{ExcavationInput, ExcavationResult};
pub use haulage::{HaulageInput, HaulageResult};
pub use kerbs::{KerbInput, KerbResult};
pub use mortar::{MortarInput, MortarResult};

use crate::breakdown::Estimate;
use crate::config::EstimationConfig;
use crate::errors::{CalcError, CalcResult, FallbackWarning};
use crate::rates::MaterialType;
use crate::transport::{TransportLeg, TransportModel, TransportOptions};

/// Enum wrapper for all calculator inputs.
///
/// ## JSON Example
///
/// ```json
/// {
///   "type": "Excavation",
///   "label": "Footing A",
///   "length_m": 15.0,
///   "width_cm": "60",
///   "depth_cm": 60,
///   "digging_method": "shovel",
///   "soil_type": "clay"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationInput {
    Excavation(ExcavationInput),
    Kerbs(KerbInput),
    Mortar(MortarInput),
    Haulage(HaulageInput),
}

/// Enum wrapper for all calculator results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationResult {
    Excavation(ExcavationResult),
    Kerbs(KerbResult),
    Mortar(MortarResult),
    Haulage(HaulageResult),
}

impl CalculationInput {
    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationInput::Excavation(i) => &i.label,
            CalculationInput::Kerbs(i) => &i.label,
            CalculationInput::Mortar(i) => &i.label,
            CalculationInput::Haulage(i) => &i.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationInput::Excavation(_) => "Excavation",
            CalculationInput::Kerbs(_) => "Kerbs",
            CalculationInput::Mortar(_) => "Mortar",
            CalculationInput::Haulage(_) => "Haulage",
        }
    }

    /// Decode one request, keeping the failing field in the error
    pub fn from_json_value(value: serde_json::Value) -> CalcResult<Self> {
        serde_json::from_value(value).map_err(CalcError::from)
    }

    /// Run the matching calculator
    pub fn calculate(&self, config: &EstimationConfig) -> CalcResult<CalculationResult> {
        Ok(match self {
            CalculationInput::Excavation(i) => CalculationResult::Excavation(excavation::calculate(i, config)?),
            CalculationInput::Kerbs(i) => CalculationResult::Kerbs(kerbs::calculate(i, config)?),
            CalculationInput::Mortar(i) => CalculationResult::Mortar(mortar::calculate(i, config)?),
            CalculationInput::Haulage(i) => CalculationResult::Haulage(haulage::calculate(i, config)?),
        })
    }

    /// Run the calculator and convert to the common output shape
    pub fn estimate(&self, config: &EstimationConfig) -> CalcResult<Estimate> {
        self.calculate(config).map(Estimate::from)
    }
}

impl From<CalculationResult> for Estimate {
    fn from(result: CalculationResult) -> Self {
        match result {
            CalculationResult::Excavation(r) => r.into(),
            CalculationResult::Kerbs(r) => r.into(),
            CalculationResult::Mortar(r) => r.into(),
            CalculationResult::Haulage(r) => r.into(),
        }
    }
}

/// Run the transport model once per delivered material, in order.
///
/// Each `(material, quantity)` pair is an independent leg. Legs with
/// nothing to move or no distance are skipped.
pub(crate) fn transport_legs(
    config: &EstimationConfig,
    transport: Option<&TransportOptions>,
    loads: &[(MaterialType, f64)],
    warnings: &mut Vec<FallbackWarning>,
) -> CalcResult<Vec<TransportLeg>> {
    let Some(options) = transport else {
        return Ok(Vec::new());
    };
    let resolved = options.resolve()?;
    let model = TransportModel::new(&config.tables);
    Ok(loads
        .iter()
        .filter_map(|(material, quantity)| model.leg(*material, *quantity, resolved, warnings))
        .collect())
}

/// `ceil` that ignores floating-point noise just above a whole number
pub(crate) fn ceil_count(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    let nearest = value.round();
    let ceiled = if (value - nearest).abs() < 1e-9 { nearest } else { value.ceil() };
    ceiled.min(u32::MAX as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_count() {
        assert_eq!(ceil_count(0.0), 0);
        assert_eq!(ceil_count(-2.0), 0);
        assert_eq!(ceil_count(f64::NAN), 0);
        assert_eq!(ceil_count(7.0), 7);
        assert_eq!(ceil_count(7.000_000_000_001), 7);
        assert_eq!(ceil_count(6.999_999_999_999), 7);
        assert_eq!(ceil_count(7.01), 8);
    }

    #[test]
    fn test_tagged_input_json() {
        let json = r#"{
            "type": "Excavation",
            "label": "Footing A",
            "length_m": 15.0,
            "width_cm": "60",
            "depth_cm": 60,
            "digging_method": "shovel",
            "soil_type": "clay"
        }"#;
        let input: CalculationInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.calc_type(), "Excavation");
        assert_eq!(input.label(), "Footing A");

        let estimate = input.estimate(&EstimationConfig::default()).unwrap();
        assert_eq!(estimate.quantity.unit, "m3");
        assert!((estimate.quantity.quantity - 5.4).abs() < 1e-9);
    }

    #[test]
    fn test_request_errors_name_the_field() {
        let footing = serde_json::json!({
            "type": "Excavation",
            "label": "Footing A",
            "length_m": 15.0,
            "width_cm": 60,
            "depth_cm": 60,
            "digging_method": "spoon",
            "soil_type": "clay"
        });
        let err = CalculationInput::from_json_value(footing.clone()).unwrap_err();
        assert_eq!(err, CalcError::unknown_option("digging_method", "spoon"));

        let mut missing = footing.clone();
        missing["digging_method"] = "small".into();
        missing.as_object_mut().unwrap().remove("length_m");
        let err = CalculationInput::from_json_value(missing).unwrap_err();
        assert_eq!(err, CalcError::missing_field("length_m"));

        let roofing = serde_json::json!({"type": "Roofing", "label": "Roof"});
        let err = CalculationInput::from_json_value(roofing).unwrap_err();
        assert_eq!(err, CalcError::unknown_option("type", "Roofing"));

        let untyped = serde_json::json!({"label": "Roof"});
        let err = CalculationInput::from_json_value(untyped).unwrap_err();
        assert_eq!(err, CalcError::missing_field("type"));
    }

    #[test]
    fn test_transport_legs_none_without_options() {
        let mut warnings = Vec::new();
        let legs = transport_legs(
            &EstimationConfig::default(),
            None,
            &[(MaterialType::Sand, 2.0)],
            &mut warnings,
        )
        .unwrap();
        assert!(legs.is_empty());
    }

    #[test]
    fn test_transport_legs_in_load_order() {
        let mut warnings = Vec::new();
        let options = TransportOptions::new(1.0, 40.0);
        let legs = transport_legs(
            &EstimationConfig::default(),
            Some(&options),
            &[(MaterialType::Kerbs, 20.0), (MaterialType::Sand, 0.0), (MaterialType::Cement, 3.0)],
            &mut warnings,
        )
        .unwrap();
        let materials: Vec<MaterialType> = legs.iter().map(|l| l.material).collect();
        assert_eq!(materials, vec![MaterialType::Kerbs, MaterialType::Cement]);
        assert!(warnings.is_empty());
    }
}
