//! # Kerbs, Edges and Setts
//!
//! Units, mortar and laying hours for a run of kerbs on a mortar bed with
//! optional haunching.
//!
//! ## Mortar
//!
//! ```text
//! bed            = length × profile width × bed height
//! hunch per side = length × 0.15 × (hunch % × standing height) / 2
//! ```
//!
//! The haunch is a triangle 15 cm wide at its base, rising to the chosen
//! fraction of the kerb's standing height. Cement and sand follow the
//! standard mix in [`MortarRequirement`].
//!
//! ## Labor
//!
//! The laying task is priced per metre from the catalog when a template with
//! hours matches the profile's task name, otherwise from the profile's
//! built-in rate. Base preparation follows as a separate task.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::breakdown::{assemble, Estimate, MaterialLine, QuantityResult, TaskBreakdownItem};
use crate::config::EstimationConfig;
use crate::errors::{CalcError, CalcResult, FallbackWarning};
use crate::rates::MaterialType;
use crate::transport::{TransportLeg, TransportOptions};
use crate::units::{round2, Centimeters, CubicMeters, Measure, Meters};

use super::mortar::MortarRequirement;
use super::{ceil_count, transport_legs};

/// Base width of the haunch triangle (m)
pub const HUNCH_BASE_WIDTH_M: f64 = 0.15;

pub const BASE_PREPARATION_TASK: &str = "Preparing base for kerbs";
/// Base preparation rate when the catalog has none (h/m)
pub const FALLBACK_BASE_PREPARATION_HOURS_PER_M: f64 = 0.1;

/// Kerb or edging product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum KerbType {
    KlKerb,
    RumbledKerb,
    FlatEdge,
    #[serde(rename = "sett_10x20")]
    Sett10x20,
}

/// How setts sit along the run. Ignored for kerbs and edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Orientation {
    #[default]
    Lengthwise,
    Widthwise,
}

impl Orientation {
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "lengthwise" | "length" => Ok(Orientation::Lengthwise),
            "widthwise" | "width" => Ok(Orientation::Widthwise),
            _ => Err(CalcError::unknown_option("orientation", s)),
        }
    }
}

/// Haunch height as a share of the standing height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum HunchLevel {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "20")]
    Pct20,
    #[serde(rename = "50")]
    Pct50,
    #[serde(rename = "80")]
    Pct80,
}

impl HunchLevel {
    pub fn fraction(&self) -> f64 {
        match self {
            HunchLevel::None => 0.0,
            HunchLevel::Pct20 => 0.2,
            HunchLevel::Pct50 => 0.5,
            HunchLevel::Pct80 => 0.8,
        }
    }

    /// Accepts `"none"`, `"0"` and the percentages with or without a `%`
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let trimmed = s.trim().to_lowercase();
        match trimmed.strip_suffix('%').unwrap_or(trimmed.as_str()).trim() {
            "none" | "0" => Ok(HunchLevel::None),
            "20" => Ok(HunchLevel::Pct20),
            "50" => Ok(HunchLevel::Pct50),
            "80" => Ok(HunchLevel::Pct80),
            _ => Err(CalcError::unknown_option("hunch", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum HunchSides {
    One,
    #[default]
    Both,
}

impl HunchSides {
    pub fn count(&self) -> f64 {
        match self {
            HunchSides::One => 1.0,
            HunchSides::Both => 2.0,
        }
    }

    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "one" | "1" | "single" => Ok(HunchSides::One),
            "both" | "2" => Ok(HunchSides::Both),
            _ => Err(CalcError::unknown_option("hunch_sides", s)),
        }
    }
}

/// Geometry and default rate for one laid product
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KerbProfile {
    /// Bed width (cm)
    pub width_cm: f64,
    /// Standing height used for haunching (cm)
    pub height_cm: f64,
    pub units_per_m: f64,
    pub fallback_hours_per_m: f64,
    pub task_name: &'static str,
}

impl KerbType {
    pub const ALL: [KerbType; 4] = [
        KerbType::KlKerb,
        KerbType::RumbledKerb,
        KerbType::FlatEdge,
        KerbType::Sett10x20,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            KerbType::KlKerb => "KL kerb",
            KerbType::RumbledKerb => "Rumbled kerb",
            KerbType::FlatEdge => "Flat edge",
            KerbType::Sett10x20 => "Sett 10x20",
        }
    }

    pub fn profile(&self, orientation: Orientation) -> KerbProfile {
        match (self, orientation) {
            (KerbType::KlKerb, _) => KerbProfile {
                width_cm: 15.0,
                height_cm: 30.0,
                units_per_m: 1.0,
                fallback_hours_per_m: 0.25,
                task_name: "Laying KL kerbs",
            },
            (KerbType::RumbledKerb, _) => KerbProfile {
                width_cm: 10.0,
                height_cm: 20.0,
                units_per_m: 5.0,
                fallback_hours_per_m: 0.35,
                task_name: "Laying rumbled kerbs",
            },
            (KerbType::FlatEdge, _) => KerbProfile {
                width_cm: 5.0,
                height_cm: 20.0,
                units_per_m: 1.0,
                fallback_hours_per_m: 0.15,
                task_name: "Laying flat edges",
            },
            (KerbType::Sett10x20, Orientation::Lengthwise) => KerbProfile {
                width_cm: 10.0,
                height_cm: 10.0,
                units_per_m: 5.0,
                fallback_hours_per_m: 0.3,
                task_name: "Laying setts 10x20",
            },
            (KerbType::Sett10x20, Orientation::Widthwise) => KerbProfile {
                width_cm: 20.0,
                height_cm: 10.0,
                units_per_m: 10.0,
                fallback_hours_per_m: 0.3,
                task_name: "Laying setts 10x20",
            },
        }
    }

    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "kl_kerb" | "kl" | "kerb" => Ok(KerbType::KlKerb),
            "rumbled_kerb" | "rumbled" => Ok(KerbType::RumbledKerb),
            "flat_edge" | "edge" => Ok(KerbType::FlatEdge),
            "sett_10x20" | "sett" | "setts" => Ok(KerbType::Sett10x20),
            _ => Err(CalcError::unknown_option("kerb_type", s)),
        }
    }
}

macro_rules! impl_try_from_string {
    ($($type:ty),+) => {
        $(
            impl TryFrom<String> for $type {
                type Error = CalcError;

                fn try_from(value: String) -> CalcResult<Self> {
                    <$type>::from_str_flexible(&value)
                }
            }
        )+
    };
}

impl_try_from_string!(KerbType, Orientation, HunchLevel, HunchSides);

/// Input parameters for a kerb run.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Drive edge",
///   "length_m": 20,
///   "kerb_type": "kl_kerb",
///   "mortar_height_cm": "10",
///   "hunch": "50",
///   "hunch_sides": "both"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KerbInput {
    pub label: String,
    pub length_m: Measure,
    pub kerb_type: KerbType,
    #[serde(default)]
    pub orientation: Orientation,
    /// Bed thickness under the kerb (cm)
    pub mortar_height_cm: Measure,
    #[serde(default)]
    pub hunch: HunchLevel,
    #[serde(default)]
    pub hunch_sides: HunchSides,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportOptions>,
}

impl KerbInput {
    pub fn new(label: impl Into<String>, length_m: f64, kerb_type: KerbType, mortar_height_cm: f64) -> Self {
        KerbInput {
            label: label.into(),
            length_m: length_m.into(),
            kerb_type,
            orientation: Orientation::default(),
            mortar_height_cm: mortar_height_cm.into(),
            hunch: HunchLevel::default(),
            hunch_sides: HunchSides::default(),
            transport: None,
        }
    }

    pub fn with_hunch(mut self, hunch: HunchLevel, sides: HunchSides) -> Self {
        self.hunch = hunch;
        self.hunch_sides = sides;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_transport(mut self, transport: TransportOptions) -> Self {
        self.transport = Some(transport);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KerbResult {
    pub label: String,
    pub kerb_type: KerbType,
    pub orientation: Orientation,
    pub length_m: f64,
    pub units: u32,

    pub bed_mortar_m3: f64,
    /// Haunching on all requested sides
    pub hunch_mortar_m3: f64,
    pub mortar: MortarRequirement,

    pub laying_hours_per_m: f64,
    pub laying_hours: f64,
    pub base_preparation_hours: f64,

    #[serde(default)]
    pub transport: Vec<TransportLeg>,
    #[serde(default)]
    pub warnings: Vec<FallbackWarning>,
}

impl KerbResult {
    pub fn profile(&self) -> KerbProfile {
        self.kerb_type.profile(self.orientation)
    }
}

pub fn calculate(input: &KerbInput, config: &EstimationConfig) -> CalcResult<KerbResult> {
    let length = Meters(input.length_m.positive("length_m")?);
    let bed_height: Meters = Centimeters(input.mortar_height_cm.positive("mortar_height_cm")?).into();
    let profile = input.kerb_type.profile(input.orientation);
    let width: Meters = Centimeters(profile.width_cm).into();
    let standing_height: Meters = Centimeters(profile.height_cm).into();

    let mut warnings = Vec::new();

    let bed = CubicMeters::of_box(length, width, bed_height);
    let hunch_height = standing_height * input.hunch.fraction();
    let hunch_per_side = CubicMeters::of_box(length, Meters(HUNCH_BASE_WIDTH_M), hunch_height) / 2.0;
    let hunch = hunch_per_side * input.hunch_sides.count();
    let mortar = MortarRequirement::for_volume(bed + hunch);

    let units = ceil_count(length.0 * profile.units_per_m);

    let laying_hours_per_m = config.labor_rate(profile.task_name, profile.fallback_hours_per_m, &mut warnings);
    let base_rate = config.labor_rate(
        BASE_PREPARATION_TASK,
        FALLBACK_BASE_PREPARATION_HOURS_PER_M,
        &mut warnings,
    );

    let mut loads = vec![(MaterialType::Kerbs, units as f64)];
    loads.extend(mortar.loads());
    let transport = transport_legs(config, input.transport.as_ref(), &loads, &mut warnings)?;

    debug!(
        label = %input.label,
        kerb_type = ?input.kerb_type,
        units,
        mortar_m3 = mortar.volume_m3,
        "kerbs calculated"
    );

    Ok(KerbResult {
        label: input.label.clone(),
        kerb_type: input.kerb_type,
        orientation: input.orientation,
        length_m: length.0,
        units,
        bed_mortar_m3: bed.0,
        hunch_mortar_m3: hunch.0,
        mortar,
        laying_hours_per_m,
        laying_hours: length.0 * laying_hours_per_m,
        base_preparation_hours: length.0 * base_rate,
        transport,
        warnings,
    })
}

impl From<KerbResult> for Estimate {
    fn from(result: KerbResult) -> Self {
        let length = round2(result.length_m);
        let primary = TaskBreakdownItem::new(result.profile().task_name, result.laying_hours, length, "m");
        let legs = result.transport.iter().map(TransportLeg::to_task).collect();
        let base = TaskBreakdownItem::new(BASE_PREPARATION_TASK, result.base_preparation_hours, length, "m");

        let mut materials = vec![MaterialLine::new(
            result.kerb_type.display_name(),
            result.units as f64,
            MaterialType::Kerbs.unit(),
        )];
        materials.extend(result.mortar.material_lines());

        Estimate {
            quantity: QuantityResult::new(length, "m"),
            task_breakdown: assemble(primary, legs, vec![base]),
            materials,
            warnings: result.warnings,
        }
    }
}
