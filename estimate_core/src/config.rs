//! # Estimation Configuration
//!
//! Everything company-specific that a calculator reads: carrier speeds,
//! per-trip capacities and the rate template catalog. It is passed into
//! every calculator call explicitly; the engine holds no session state.
//!
//! ## File Format (TOML)
//!
//! ```toml
//! carriers = [
//!     { size_class = 1.0, speed_m_per_hour = 4500.0, name = "Site dumper" },
//! ]
//!
//! [[catalog]]
//! id = "tpl-12"
//! name = "Laying KL kerbs"
//! unit = "m"
//! estimated_hours_per_unit = 0.3
//! ```
//!
//! Sections left out (`carriers`, `capacities`) fall back to the built-in
//! tables. JSON files use the same field names.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::config::EstimationConfig;
//!
//! let config = EstimationConfig::from_toml_str(r#"
//!     [[catalog]]
//!     id = "tpl-1"
//!     name = "Mixing mortar"
//!     unit = "m3"
//!     estimated_hours_per_unit = 1.2
//! "#).unwrap();
//!
//! assert_eq!(config.catalog.len(), 1);
//! assert!(!config.tables.carriers.is_empty()); // built-in carriers
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{CalcError, CalcResult, FallbackWarning};
use crate::matching::{find_template, MatchStrategy, RateTemplate};
use crate::rates::{CarrierSpec, MaterialCapacityEntry, RateTables};

/// Resolved configuration for one estimation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationConfig {
    pub tables: RateTables,
    pub catalog: Vec<RateTemplate>,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        EstimationConfig {
            tables: RateTables::builtin().clone(),
            catalog: Vec::new(),
        }
    }
}

/// On-disk shape; every section optional
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    carriers: Option<Vec<CarrierSpec>>,
    capacities: Option<Vec<MaterialCapacityEntry>>,
    #[serde(default)]
    catalog: Vec<RateTemplate>,
}

impl From<ConfigFile> for EstimationConfig {
    fn from(file: ConfigFile) -> Self {
        let builtin = RateTables::builtin();
        EstimationConfig {
            tables: RateTables {
                carriers: file.carriers.unwrap_or_else(|| builtin.carriers.clone()),
                capacities: file.capacities.unwrap_or_else(|| builtin.capacities.clone()),
            },
            catalog: file.catalog,
        }
    }
}

/// Template-derived rate for a labor task
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateRate {
    pub template_id: String,
    pub hours_per_unit: f64,
    pub strategy: MatchStrategy,
}

impl EstimationConfig {
    pub fn new(tables: RateTables, catalog: Vec<RateTemplate>) -> Self {
        EstimationConfig { tables, catalog }
    }

    /// Built-in tables with a company catalog
    pub fn with_catalog(catalog: Vec<RateTemplate>) -> Self {
        EstimationConfig {
            catalog,
            ..EstimationConfig::default()
        }
    }

    pub fn from_toml_str(text: &str) -> CalcResult<Self> {
        let file: ConfigFile = toml::from_str(text)?;
        Ok(file.into())
    }

    pub fn from_json_str(text: &str) -> CalcResult<Self> {
        let file: ConfigFile = serde_json::from_str(text)?;
        Ok(file.into())
    }

    /// Hours per unit from the catalog for a task name.
    ///
    /// Only templates with positive hours count; a matched template without
    /// hours is treated as no rate.
    pub fn template_hours(&self, task_name: &str) -> Option<TemplateRate> {
        let (template, strategy) = find_template(task_name, &self.catalog)?;
        let hours_per_unit = template.positive_hours()?;
        Some(TemplateRate {
            template_id: template.id.clone(),
            hours_per_unit,
            strategy,
        })
    }

    /// Template hours per unit, or `fallback` with a warning.
    pub fn labor_rate(&self, task_name: &str, fallback: f64, warnings: &mut Vec<FallbackWarning>) -> f64 {
        match self.template_hours(task_name) {
            Some(rate) => rate.hours_per_unit,
            None => {
                debug!(task = task_name, fallback, "no rate template hours, using built-in rate");
                warnings.push(FallbackWarning::FallbackLaborRate {
                    task: task_name.to_string(),
                    hours_per_unit: fallback,
                });
                fallback
            }
        }
    }
}

/// Load a configuration file; `.json` is read as JSON, anything else as TOML.
pub fn load_config(path: &Path) -> CalcResult<EstimationConfig> {
    let path_label = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|e| CalcError::config_error(&path_label, e.to_string()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config = if is_json {
        EstimationConfig::from_json_str(&text)
    } else {
        EstimationConfig::from_toml_str(&text)
    }
    .map_err(|e| CalcError::config_error(&path_label, e.to_string()))?;

    info!(
        path = %path_label,
        carriers = config.tables.carriers.len(),
        capacities = config.tables.capacities.len(),
        templates = config.catalog.len(),
        "loaded estimation config"
    );
    Ok(config)
}
