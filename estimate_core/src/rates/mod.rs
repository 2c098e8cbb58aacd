//! # Rate Tables
//!
//! Static reference data used by the transport model: carrier travel speed
//! by size class, and load capacity per trip by (material, size class).
//!
//! The built-in tables are compiled in from `data/rate_tables.toml` and
//! parsed once on first use. Company tables are supplied through
//! [`EstimationConfig`](crate::config::EstimationConfig) and replace the
//! built-ins wholesale.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::rates::{MaterialType, RateTables, DEFAULT_CARRIER_SPEED_M_PER_HOUR};
//!
//! let tables = RateTables::builtin();
//! assert_eq!(tables.carrier_speed(1.0), 5000.0);
//! assert_eq!(tables.carrier_speed(42.0), DEFAULT_CARRIER_SPEED_M_PER_HOUR);
//! assert_eq!(tables.material_capacity(MaterialType::Cement, 1.0), Some(40.0));
//! ```

pub mod capacities;
pub mod carriers;

pub use capacities::MaterialCapacityEntry;
pub use carriers::{CarrierSpec, DEFAULT_CARRIER_SPEED_M_PER_HOUR};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult, FallbackWarning};

const BUILTIN_TABLES_TOML: &str = include_str!("../../data/rate_tables.toml");

static BUILTIN_TABLES: Lazy<RateTables> = Lazy::new(|| {
    RateTables::from_toml_str(BUILTIN_TABLES_TOML).unwrap_or_else(|err| {
        tracing::error!(error = %err, "built-in rate tables failed to parse; starting empty");
        RateTables::default()
    })
});

/// Material categories that can be hauled.
///
/// Serialized as lowercase literals (`"soil"`, `"sand"`, ...). Deserializing
/// goes through [`MaterialType::from_str_flexible`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum MaterialType {
    Soil,
    Sand,
    Cement,
    Kerbs,
    Aggregate,
    Slabs,
    Bricks,
    Blocks,
}

impl MaterialType {
    /// All material types for UI selection
    pub const ALL: [MaterialType; 8] = [
        MaterialType::Soil,
        MaterialType::Sand,
        MaterialType::Cement,
        MaterialType::Kerbs,
        MaterialType::Aggregate,
        MaterialType::Slabs,
        MaterialType::Bricks,
        MaterialType::Blocks,
    ];

    /// Literal used in config files and JSON
    pub fn code(&self) -> &'static str {
        match self {
            MaterialType::Soil => "soil",
            MaterialType::Sand => "sand",
            MaterialType::Cement => "cement",
            MaterialType::Kerbs => "kerbs",
            MaterialType::Aggregate => "aggregate",
            MaterialType::Slabs => "slabs",
            MaterialType::Bricks => "bricks",
            MaterialType::Blocks => "blocks",
        }
    }

    /// Unit in which quantities and capacities of this material are counted
    pub fn unit(&self) -> &'static str {
        match self {
            MaterialType::Soil | MaterialType::Sand | MaterialType::Aggregate => "t",
            MaterialType::Cement => "bags",
            MaterialType::Kerbs | MaterialType::Slabs | MaterialType::Bricks | MaterialType::Blocks => "pcs",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "soil" | "earth" | "excavated soil" => Ok(MaterialType::Soil),
            "sand" => Ok(MaterialType::Sand),
            "cement" => Ok(MaterialType::Cement),
            "kerbs" | "kerb" | "edges" | "setts" => Ok(MaterialType::Kerbs),
            "aggregate" | "gravel" | "type 1" => Ok(MaterialType::Aggregate),
            "slabs" | "slab" | "paving" => Ok(MaterialType::Slabs),
            "bricks" | "brick" => Ok(MaterialType::Bricks),
            "blocks" | "block" => Ok(MaterialType::Blocks),
            _ => Err(CalcError::unknown_option("material", s)),
        }
    }
}

impl TryFrom<String> for MaterialType {
    type Error = CalcError;

    fn try_from(value: String) -> CalcResult<Self> {
        MaterialType::from_str_flexible(&value)
    }
}

impl std::fmt::Display for MaterialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Carrier speeds and per-trip capacities.
///
/// Pure lookups over immutable data; cheap to clone and safe to share
/// across threads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateTables {
    #[serde(default)]
    pub carriers: Vec<CarrierSpec>,
    #[serde(default)]
    pub capacities: Vec<MaterialCapacityEntry>,
}

impl RateTables {
    pub fn new(carriers: Vec<CarrierSpec>, capacities: Vec<MaterialCapacityEntry>) -> Self {
        RateTables { carriers, capacities }
    }

    /// Built-in tables shipped with the engine
    pub fn builtin() -> &'static RateTables {
        &BUILTIN_TABLES
    }

    /// Parse tables from TOML text
    pub fn from_toml_str(text: &str) -> CalcResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Configured speed for an exact size class, else the default of 4000 m/h
    pub fn carrier_speed(&self, size_class: f64) -> f64 {
        carriers::speed_for(&self.carriers, size_class).0
    }

    /// As [`carrier_speed`](Self::carrier_speed), also reporting a fallback
    pub fn carrier_speed_checked(&self, size_class: f64) -> (f64, Option<FallbackWarning>) {
        carriers::speed_for(&self.carriers, size_class)
    }

    /// Capacity per trip for an exact (material, size class) pair
    pub fn material_capacity(&self, material: MaterialType, size_class: f64) -> Option<f64> {
        capacities::capacity_for(&self.capacities, material, size_class)
    }

    /// Configured carrier for a size class, if any
    pub fn carrier(&self, size_class: f64) -> Option<&CarrierSpec> {
        carriers::find_carrier(&self.carriers, size_class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_parse() {
        let tables = RateTables::builtin();
        assert_eq!(tables.carriers.len(), 6);
        assert_eq!(tables.capacities.len(), 48);
    }

    #[test]
    fn test_builtin_lookups() {
        let tables = RateTables::builtin();
        assert_eq!(tables.carrier_speed(0.1), 3000.0);
        assert_eq!(tables.carrier(0.1).and_then(|c| c.name.as_deref()), Some("Wheelbarrow"));
        assert_eq!(tables.material_capacity(MaterialType::Soil, 3.0), Some(3.0));
        assert_eq!(tables.material_capacity(MaterialType::Kerbs, 0.5), Some(6.0));
    }

    #[test]
    fn test_every_material_has_builtin_capacity_for_every_carrier() {
        let tables = RateTables::builtin();
        for carrier in &tables.carriers {
            for material in MaterialType::ALL {
                let capacity = tables.material_capacity(material, carrier.size_class);
                assert!(
                    matches!(capacity, Some(c) if c > 0.0),
                    "{} on {}",
                    material,
                    carrier.display_name()
                );
            }
        }
    }

    #[test]
    fn test_unknown_size_class() {
        let tables = RateTables::builtin();
        assert_eq!(tables.carrier_speed(2.0), DEFAULT_CARRIER_SPEED_M_PER_HOUR);
        assert!(tables.carrier_speed_checked(2.0).1.is_some());
        assert_eq!(tables.material_capacity(MaterialType::Sand, 2.0), None);
    }

    #[test]
    fn test_material_type_parsing() {
        assert_eq!(MaterialType::from_str_flexible(" Sand ").unwrap(), MaterialType::Sand);
        assert_eq!(MaterialType::from_str_flexible("setts").unwrap(), MaterialType::Kerbs);
        assert!(MaterialType::from_str_flexible("glass").is_err());
    }

    #[test]
    fn test_material_type_serialization() {
        let json = serde_json::to_string(&MaterialType::Aggregate).unwrap();
        assert_eq!(json, "\"aggregate\"");
        let parsed: MaterialType = serde_json::from_str("\"cement\"").unwrap();
        assert_eq!(parsed, MaterialType::Cement);
        assert_eq!(parsed.unit(), "bags");
    }
}
