//! # estimate_core - Groundwork Estimation Engine
//!
//! `estimate_core` turns site measurements into labor hours, material
//! quantities and haulage time for landscaping and groundwork jobs, and
//! reconciles the resulting task lines against a company's catalog of rate
//! templates. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions over an explicit [`EstimationConfig`]
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **No silent guesses**: Configuration gaps become [`FallbackWarning`]s
//!
//! ## Quick Start
//!
//! ```rust
//! use estimate_core::calculations::excavation::{DiggingMethod, ExcavationInput, SoilType};
//! use estimate_core::calculations::CalculationInput;
//! use estimate_core::transport::TransportOptions;
//! use estimate_core::EstimationConfig;
//!
//! let input = CalculationInput::Excavation(
//!     ExcavationInput::new("Footing A", 15.0, 60.0, 60.0, DiggingMethod::Shovel, SoilType::Clay)
//!         .with_transport(TransportOptions::new(1.0, 30.0)),
//! );
//! let estimate = input.estimate(&EstimationConfig::default()).unwrap();
//!
//! assert_eq!(estimate.task_breakdown[0].name, "Excavating foundation with shovel");
//! assert_eq!(estimate.task_breakdown[1].name, "Transport soil");
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Excavation, kerb, mortar and haulage calculators
//! - [`transport`] - Trips and haul time for one material leg
//! - [`rates`] - Carrier speeds and per-trip material capacities
//! - [`breakdown`] - The common estimate shape and task ordering
//! - [`matching`] - Task name to rate template reconciliation
//! - [`config`] - Company tables and catalog loading
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error and warning types

pub mod breakdown;
pub mod calculations;
pub mod config;
pub mod errors;
pub mod matching;
pub mod rates;
pub mod transport;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use breakdown::{Estimate, MaterialLine, QuantityResult, TaskBreakdownItem};
pub use calculations::{CalculationInput, CalculationResult};
pub use config::{load_config, EstimationConfig};
pub use errors::{CalcError, CalcResult, FallbackWarning};
pub use matching::{match_template, reconcile, MatchResult, MatchStrategy, RateTemplate, TemplateMatcher};
pub use rates::{MaterialType, RateTables};
pub use transport::{transport_time, TransportEstimate, TransportOptions};
