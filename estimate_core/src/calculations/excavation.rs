//! # Foundation Excavation
//!
//! Volume, soil mass, bulked volume and digging hours for a strip
//! foundation trench.
//!
//! ## Labor model
//!
//! Hand digging is the baseline at 0.45 m³/h for a reference trench of
//! 15 m × 0.6 m × 0.6 m. Other trench shapes are scaled by a weighted
//! dimension factor, dominated by length:
//!
//! ```text
//! factor       = 0.5·L/15 + 0.3·W/0.6 + 0.2·D/0.6
//! manual hours = volume / 0.45 × factor
//! labor hours  = manual hours / method multiplier
//! ```
//!
//! The method multiplier comes from the company catalog when it has hours
//! per m³ for the method's task (baseline h/m³ ÷ template h/m³). Otherwise
//! the fixed multipliers apply: shovel 1, small excavator 6, medium 12,
//! large 25.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::calculations::excavation::{calculate, DiggingMethod, ExcavationInput, SoilType};
//! use estimate_core::config::EstimationConfig;
//!
//! let input = ExcavationInput::new("Footing A", 15.0, 60.0, 60.0, DiggingMethod::Shovel, SoilType::Clay);
//! let result = calculate(&input, &EstimationConfig::default()).unwrap();
//!
//! assert!((result.volume_m3 - 5.4).abs() < 1e-9);
//! assert!((result.labor_hours - 12.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::breakdown::{assemble, Estimate, MaterialLine, QuantityResult, TaskBreakdownItem};
use crate::config::EstimationConfig;
use crate::errors::{CalcError, CalcResult, FallbackWarning};
use crate::rates::MaterialType;
use crate::transport::{TransportLeg, TransportOptions};
use crate::units::{checked_div, round2, Centimeters, CubicMeters, Measure, Meters};

use super::transport_legs;

/// Hand-digging baseline (m³/h) for the reference trench
pub const MANUAL_RATE_M3_PER_HOUR: f64 = 0.45;

/// Reference trench length (m)
pub const REFERENCE_LENGTH_M: f64 = 15.0;
/// Reference trench width (m)
pub const REFERENCE_WIDTH_M: f64 = 0.6;
/// Reference trench depth (m)
pub const REFERENCE_DEPTH_M: f64 = 0.6;

const LENGTH_WEIGHT: f64 = 0.5;
const WIDTH_WEIGHT: f64 = 0.3;
const DEPTH_WEIGHT: f64 = 0.2;

/// Digging equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum DiggingMethod {
    #[serde(rename = "shovel")]
    Shovel,
    #[serde(rename = "small")]
    SmallExcavator,
    #[serde(rename = "medium")]
    MediumExcavator,
    #[serde(rename = "large")]
    LargeExcavator,
}

impl DiggingMethod {
    pub const ALL: [DiggingMethod; 4] = [
        DiggingMethod::Shovel,
        DiggingMethod::SmallExcavator,
        DiggingMethod::MediumExcavator,
        DiggingMethod::LargeExcavator,
    ];

    /// Productivity relative to hand digging when no template is available
    pub fn fixed_multiplier(&self) -> f64 {
        match self {
            DiggingMethod::Shovel => 1.0,
            DiggingMethod::SmallExcavator => 6.0,
            DiggingMethod::MediumExcavator => 12.0,
            DiggingMethod::LargeExcavator => 25.0,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DiggingMethod::Shovel => "shovel",
            DiggingMethod::SmallExcavator => "small excavator",
            DiggingMethod::MediumExcavator => "medium excavator",
            DiggingMethod::LargeExcavator => "large excavator",
        }
    }

    /// Breakdown and catalog task name
    pub fn task_name(&self) -> String {
        format!("Excavating foundation with {}", self.display_name())
    }

    /// Parse from the form literals and a few common spellings
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "shovel" | "manual" | "hand" => Ok(DiggingMethod::Shovel),
            "small" | "small excavator" => Ok(DiggingMethod::SmallExcavator),
            "medium" | "medium excavator" => Ok(DiggingMethod::MediumExcavator),
            "large" | "large excavator" => Ok(DiggingMethod::LargeExcavator),
            _ => Err(CalcError::unknown_option("digging_method", s)),
        }
    }
}

impl TryFrom<String> for DiggingMethod {
    type Error = CalcError;

    fn try_from(value: String) -> CalcResult<Self> {
        DiggingMethod::from_str_flexible(&value)
    }
}

/// Soil being dug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum SoilType {
    Clay,
    Sand,
    Rock,
}

impl SoilType {
    pub const ALL: [SoilType; 3] = [SoilType::Clay, SoilType::Sand, SoilType::Rock];

    /// In-situ density (t/m³)
    pub fn density_t_per_m3(&self) -> f64 {
        match self {
            SoilType::Clay => 1.5,
            SoilType::Sand => 1.6,
            SoilType::Rock => 2.2,
        }
    }

    /// Bulking factor once disturbed
    pub fn expansion_coefficient(&self) -> f64 {
        match self {
            SoilType::Clay => 1.20,
            SoilType::Sand => 1.025,
            SoilType::Rock => 1.075,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SoilType::Clay => "Clay",
            SoilType::Sand => "Sand",
            SoilType::Rock => "Rock",
        }
    }

    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "clay" => Ok(SoilType::Clay),
            "sand" | "sandy" => Ok(SoilType::Sand),
            "rock" | "stone" => Ok(SoilType::Rock),
            _ => Err(CalcError::unknown_option("soil_type", s)),
        }
    }
}

impl TryFrom<String> for SoilType {
    type Error = CalcError;

    fn try_from(value: String) -> CalcResult<Self> {
        SoilType::from_str_flexible(&value)
    }
}

/// Input parameters for a foundation trench.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Footing A",
///   "length_m": 15.0,
///   "width_cm": 60,
///   "depth_cm": "60",
///   "digging_method": "small",
///   "soil_type": "clay",
///   "transport": { "carrier_size_class": 1.0, "one_way_distance_m": 30 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcavationInput {
    pub label: String,

    /// Trench length in metres
    pub length_m: Measure,

    /// Trench width in centimetres
    pub width_cm: Measure,

    /// Trench depth in centimetres
    pub depth_cm: Measure,

    pub digging_method: DiggingMethod,

    pub soil_type: SoilType,

    /// Haul the excavated soil away
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportOptions>,
}

/// Validated trench dimensions in metres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrenchDimensions {
    pub length: Meters,
    pub width: Meters,
    pub depth: Meters,
}

impl TrenchDimensions {
    pub fn volume(&self) -> CubicMeters {
        CubicMeters::of_box(self.length, self.width, self.depth)
    }

    /// Weighted size relative to the reference trench; 1.0 at the reference
    pub fn dimension_factor(&self) -> f64 {
        let ratio = |value: f64, reference: f64| checked_div(value, reference).unwrap_or(0.0);
        LENGTH_WEIGHT * ratio(self.length.0, REFERENCE_LENGTH_M)
            + WIDTH_WEIGHT * ratio(self.width.0, REFERENCE_WIDTH_M)
            + DEPTH_WEIGHT * ratio(self.depth.0, REFERENCE_DEPTH_M)
    }
}

impl ExcavationInput {
    pub fn new(
        label: impl Into<String>,
        length_m: f64,
        width_cm: f64,
        depth_cm: f64,
        digging_method: DiggingMethod,
        soil_type: SoilType,
    ) -> Self {
        ExcavationInput {
            label: label.into(),
            length_m: length_m.into(),
            width_cm: width_cm.into(),
            depth_cm: depth_cm.into(),
            digging_method,
            soil_type,
            transport: None,
        }
    }

    pub fn with_transport(mut self, transport: TransportOptions) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Validate and convert dimensions to metres
    pub fn dimensions(&self) -> CalcResult<TrenchDimensions> {
        Ok(TrenchDimensions {
            length: Meters(self.length_m.positive("length_m")?),
            width: Centimeters(self.width_cm.positive("width_cm")?).into(),
            depth: Centimeters(self.depth_cm.positive("depth_cm")?).into(),
        })
    }
}

/// Where the digging method multiplier came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum MultiplierSource {
    Template { template_id: String },
    Fixed,
}

/// Results from the excavation calculator. Full precision throughout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcavationResult {
    pub label: String,
    pub digging_method: DiggingMethod,
    pub soil_type: SoilType,

    /// In-situ volume (m³)
    pub volume_m3: f64,
    /// Weighted dimension factor (1.0 for the reference trench)
    pub dimension_factor: f64,
    /// Hand-digging hours before the method multiplier
    pub manual_hours: f64,
    pub method_multiplier: f64,
    pub multiplier_source: MultiplierSource,
    /// Digging hours for the selected method
    pub labor_hours: f64,

    /// Mass of excavated soil (t)
    pub soil_mass_t: f64,
    /// Bulked volume after excavation (m³)
    pub loose_volume_m3: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportLeg>,
    #[serde(default)]
    pub warnings: Vec<FallbackWarning>,
}

impl ExcavationResult {
    pub fn task_name(&self) -> String {
        self.digging_method.task_name()
    }
}

/// Resolve the method multiplier, preferring catalog hours per m³
fn method_multiplier(
    method: DiggingMethod,
    config: &EstimationConfig,
    warnings: &mut Vec<FallbackWarning>,
) -> (f64, MultiplierSource) {
    let task = method.task_name();
    let baseline_hours_per_m3 = 1.0 / MANUAL_RATE_M3_PER_HOUR;

    if let Some(rate) = config.template_hours(&task) {
        if let Some(multiplier) = checked_div(baseline_hours_per_m3, rate.hours_per_unit) {
            debug!(task = %task, template_id = %rate.template_id, multiplier, "digging multiplier from template");
            return (
                multiplier,
                MultiplierSource::Template {
                    template_id: rate.template_id,
                },
            );
        }
    }

    let multiplier = method.fixed_multiplier();
    warnings.push(FallbackWarning::FixedDiggingMultiplier { task, multiplier });
    (multiplier, MultiplierSource::Fixed)
}

/// Calculate excavation quantities and hours.
///
/// # Returns
///
/// * `Ok(ExcavationResult)` - Calculation results
/// * `Err(CalcError)` - If a dimension is missing, non-numeric or not positive
pub fn calculate(input: &ExcavationInput, config: &EstimationConfig) -> CalcResult<ExcavationResult> {
    let dims = input.dimensions()?;
    let mut warnings = Vec::new();

    let volume = dims.volume();
    let dimension_factor = dims.dimension_factor();
    let manual_hours = volume.0 / MANUAL_RATE_M3_PER_HOUR * dimension_factor;

    let (method_multiplier, multiplier_source) = method_multiplier(input.digging_method, config, &mut warnings);
    let labor_hours = checked_div(manual_hours, method_multiplier).unwrap_or(manual_hours);

    let soil_mass = volume.mass_at(input.soil_type.density_t_per_m3());
    let loose_volume = volume * input.soil_type.expansion_coefficient();

    let transport = transport_legs(
        config,
        input.transport.as_ref(),
        &[(MaterialType::Soil, soil_mass.0)],
        &mut warnings,
    )?
    .into_iter()
    .next();

    debug!(
        label = %input.label,
        volume_m3 = volume.0,
        dimension_factor,
        labor_hours,
        "excavation calculated"
    );

    Ok(ExcavationResult {
        label: input.label.clone(),
        digging_method: input.digging_method,
        soil_type: input.soil_type,
        volume_m3: volume.0,
        dimension_factor,
        manual_hours,
        method_multiplier,
        multiplier_source,
        labor_hours,
        soil_mass_t: soil_mass.0,
        loose_volume_m3: loose_volume.0,
        transport,
        warnings,
    })
}

impl From<ExcavationResult> for Estimate {
    fn from(result: ExcavationResult) -> Self {
        let primary = TaskBreakdownItem::new(result.task_name(), result.labor_hours, round2(result.volume_m3), "m3");
        let legs = result.transport.iter().map(TransportLeg::to_task).collect();

        Estimate {
            quantity: QuantityResult::new(round2(result.volume_m3), "m3"),
            task_breakdown: assemble(primary, legs, Vec::new()),
            materials: vec![
                MaterialLine::new("Excavated soil", round2(result.soil_mass_t), "t"),
                MaterialLine::new("Loose soil volume", round2(result.loose_volume_m3), "m3"),
            ],
            warnings: result.warnings,
        }
    }
}
