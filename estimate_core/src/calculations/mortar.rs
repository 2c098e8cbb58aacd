//! # Mortar
//!
//! Mortar volume for a bed or screed and the cement and sand it takes.
//!
//! The mix is fixed per cubic metre of mortar:
//!
//! | Component | Per m³  | Supplied as        |
//! |-----------|---------|--------------------|
//! | Cement    | 350 kg  | 25 kg bags, ceiled |
//! | Sand      | 1600 kg | tonnes             |
//!
//! [`MortarRequirement`] is shared with the kerb calculator, which derives
//! its mortar volume from the bed and haunching.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::breakdown::{assemble, Estimate, MaterialLine, QuantityResult, TaskBreakdownItem};
use crate::config::EstimationConfig;
use crate::errors::{CalcResult, FallbackWarning};
use crate::rates::MaterialType;
use crate::transport::{TransportLeg, TransportOptions};
use crate::units::{round2, Centimeters, CubicMeters, Kilograms, Measure, Meters, Tonnes};

use super::{ceil_count, transport_legs};

/// Cement per m³ of mortar (kg)
pub const CEMENT_KG_PER_M3: f64 = 350.0;
/// Sand per m³ of mortar (kg)
pub const SAND_KG_PER_M3: f64 = 1600.0;
/// Cement bag size (kg)
pub const CEMENT_BAG_KG: f64 = 25.0;

/// Mixing rate when the catalog has none (h/m³)
pub const FALLBACK_MIXING_HOURS_PER_M3: f64 = 1.5;

pub const MIXING_TASK: &str = "Mixing mortar";

/// Cement and sand for a volume of mortar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortarRequirement {
    pub volume_m3: f64,
    pub cement_kg: f64,
    /// Whole bags; partial bags round up
    pub cement_bags: u32,
    pub sand_kg: f64,
}

impl MortarRequirement {
    pub fn for_volume(volume: CubicMeters) -> Self {
        let volume_m3 = volume.0.max(0.0);
        let cement_kg = volume_m3 * CEMENT_KG_PER_M3;
        MortarRequirement {
            volume_m3,
            cement_kg,
            cement_bags: ceil_count(cement_kg / CEMENT_BAG_KG),
            sand_kg: volume_m3 * SAND_KG_PER_M3,
        }
    }

    pub fn sand_tonnes(&self) -> f64 {
        Tonnes::from(Kilograms(self.sand_kg)).0
    }

    /// Cement and sand as material lines
    pub fn material_lines(&self) -> Vec<MaterialLine> {
        vec![
            MaterialLine::new("Cement", self.cement_bags as f64, MaterialType::Cement.unit()),
            MaterialLine::new("Sand", round2(self.sand_tonnes()), MaterialType::Sand.unit()),
        ]
    }

    /// Transport loads for the mix: sand then cement
    pub fn loads(&self) -> [(MaterialType, f64); 2] {
        [
            (MaterialType::Sand, self.sand_tonnes()),
            (MaterialType::Cement, self.cement_bags as f64),
        ]
    }
}

/// Input parameters for a mortar bed.
///
/// ## JSON Example
///
/// ```json
/// { "label": "Patio bed", "length_m": 10, "width_cm": 100, "thickness_cm": "5" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortarInput {
    pub label: String,
    pub length_m: Measure,
    pub width_cm: Measure,
    pub thickness_cm: Measure,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportOptions>,
}

impl MortarInput {
    pub fn new(label: impl Into<String>, length_m: f64, width_cm: f64, thickness_cm: f64) -> Self {
        MortarInput {
            label: label.into(),
            length_m: length_m.into(),
            width_cm: width_cm.into(),
            thickness_cm: thickness_cm.into(),
            transport: None,
        }
    }

    pub fn with_transport(mut self, transport: TransportOptions) -> Self {
        self.transport = Some(transport);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortarResult {
    pub label: String,
    pub mortar: MortarRequirement,
    pub mixing_hours_per_m3: f64,
    pub labor_hours: f64,
    #[serde(default)]
    pub transport: Vec<TransportLeg>,
    #[serde(default)]
    pub warnings: Vec<FallbackWarning>,
}

pub fn calculate(input: &MortarInput, config: &EstimationConfig) -> CalcResult<MortarResult> {
    let length = Meters(input.length_m.positive("length_m")?);
    let width: Meters = Centimeters(input.width_cm.positive("width_cm")?).into();
    let thickness: Meters = Centimeters(input.thickness_cm.positive("thickness_cm")?).into();

    let mut warnings = Vec::new();
    let mortar = MortarRequirement::for_volume(CubicMeters::of_box(length, width, thickness));

    let mixing_hours_per_m3 = config.labor_rate(MIXING_TASK, FALLBACK_MIXING_HOURS_PER_M3, &mut warnings);
    let labor_hours = mortar.volume_m3 * mixing_hours_per_m3;

    let transport = transport_legs(config, input.transport.as_ref(), &mortar.loads(), &mut warnings)?;

    debug!(
        label = %input.label,
        volume_m3 = mortar.volume_m3,
        cement_bags = mortar.cement_bags,
        labor_hours,
        "mortar calculated"
    );

    Ok(MortarResult {
        label: input.label.clone(),
        mortar,
        mixing_hours_per_m3,
        labor_hours,
        transport,
        warnings,
    })
}

impl From<MortarResult> for Estimate {
    fn from(result: MortarResult) -> Self {
        let volume = round2(result.mortar.volume_m3);
        let primary = TaskBreakdownItem::new(MIXING_TASK, result.labor_hours, volume, "m3");
        let legs = result.transport.iter().map(TransportLeg::to_task).collect();

        Estimate {
            quantity: QuantityResult::new(volume, "m3"),
            task_breakdown: assemble(primary, legs, Vec::new()),
            materials: result.mortar.material_lines(),
            warnings: result.warnings,
        }
    }
}
