//! # Generic Haulage
//!
//! Moving a quantity of any material category from the drop point to where
//! it is used. The haul itself is the primary task, so a haul needs a
//! distance greater than zero.

use serde::{Deserialize, Serialize};

use crate::breakdown::{assemble, Estimate, QuantityResult};
use crate::config::EstimationConfig;
use crate::errors::{CalcError, CalcResult, FallbackWarning};
use crate::rates::MaterialType;
use crate::transport::{TransportLeg, TransportModel, TransportOptions};
use crate::units::{round2, Measure};

/// Input parameters for a haul.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Block delivery",
///   "material": "blocks",
///   "quantity": 240,
///   "transport": { "carrier_size_class": 0.5, "one_way_distance_m": 25 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HaulageInput {
    pub label: String,
    pub material: MaterialType,
    /// Amount in the material's own unit (t, bags or pcs)
    pub quantity: Measure,
    pub transport: TransportOptions,
}

impl HaulageInput {
    pub fn new(label: impl Into<String>, material: MaterialType, quantity: f64, transport: TransportOptions) -> Self {
        HaulageInput {
            label: label.into(),
            material,
            quantity: quantity.into(),
            transport,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HaulageResult {
    pub label: String,
    pub material: MaterialType,
    pub quantity: f64,
    pub leg: TransportLeg,
    #[serde(default)]
    pub warnings: Vec<FallbackWarning>,
}

impl HaulageResult {
    pub fn hours(&self) -> f64 {
        self.leg.estimate.total_time_h
    }
}

pub fn calculate(input: &HaulageInput, config: &EstimationConfig) -> CalcResult<HaulageResult> {
    let quantity = input.quantity.positive("quantity")?;
    let transport = input.transport.resolve()?;
    let mut warnings = Vec::new();

    let leg = TransportModel::new(&config.tables)
        .leg(input.material, quantity, transport, &mut warnings)
        .ok_or_else(|| {
            CalcError::invalid_input(
                "transport.one_way_distance_m",
                transport.one_way_distance_m.to_string(),
                "Haulage needs a distance greater than zero",
            )
        })?;

    Ok(HaulageResult {
        label: input.label.clone(),
        material: input.material,
        quantity,
        leg,
        warnings,
    })
}

impl From<HaulageResult> for Estimate {
    fn from(result: HaulageResult) -> Self {
        let unit = result.material.unit();
        let quantity = round2(result.quantity);
        Estimate {
            quantity: QuantityResult::new(quantity, unit),
            task_breakdown: assemble(result.leg.to_task(), Vec::new(), Vec::new()),
            materials: Vec::new(),
            warnings: result.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::{CarrierSpec, RateTables};

    #[test]
    fn test_block_haul() {
        // 240 blocks, 30 per trip on the mini dumper at 4000 m/h
        let input = HaulageInput::new("Blocks", MaterialType::Blocks, 240.0, TransportOptions::new(0.5, 25.0));
        let result = calculate(&input, &EstimationConfig::default()).unwrap();
        let leg = &result.leg;
        assert_eq!(leg.estimate.trips, 8);
        assert!((leg.estimate.time_per_trip_h - 0.0125).abs() < 1e-12);
        assert!((result.hours() - 0.1).abs() < 1e-12);

        let estimate = Estimate::from(result);
        assert_eq!(estimate.quantity.unit, "pcs");
        assert_eq!(estimate.task_breakdown.len(), 1);
        assert_eq!(estimate.task_breakdown[0].name, "Transport blocks");
    }

    #[test]
    fn test_zero_distance_is_rejected() {
        let input = HaulageInput::new("Sand", MaterialType::Sand, 2.0, TransportOptions::new(1.0, 0.0));
        let err = calculate(&input, &EstimationConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CalcError::InvalidInput { ref field, .. } if field == "transport.one_way_distance_m"
        ));
        assert!(err.is_validation());
    }

    #[test]
    fn test_configuration_gaps_are_reported() {
        let config = EstimationConfig::new(
            RateTables::new(vec![CarrierSpec::new(2.0, 5500.0)], Vec::new()),
            Vec::new(),
        );
        let input = HaulageInput::new("Slabs", MaterialType::Slabs, 100.0, TransportOptions::new(2.0, 30.0));
        let result = calculate(&input, &config).unwrap();
        let leg = &result.leg;

        // 2 t carrier / 50 kg slabs
        assert_eq!(leg.capacity_per_trip, 40.0);
        assert_eq!(leg.estimate.trips, 3);
        assert_eq!(leg.speed_m_per_hour, 5500.0);
        assert!(matches!(
            result.warnings.as_slice(),
            [FallbackWarning::MissingCapacity { material: MaterialType::Slabs, .. }]
        ));
    }

    #[test]
    fn test_validation() {
        let mut input = HaulageInput::new("Sand", MaterialType::Sand, 2.0, TransportOptions::new(1.0, 10.0));
        input.quantity = Measure::from("");
        assert!(matches!(
            calculate(&input, &EstimationConfig::default()).unwrap_err(),
            CalcError::InvalidInput { ref field, .. } if field == "quantity"
        ));

        let input = HaulageInput::new("Sand", MaterialType::Sand, 2.0, TransportOptions::new(1.0, -10.0));
        assert!(calculate(&input, &EstimationConfig::default()).is_err());
    }
}
