//! # Transport Time Model
//!
//! Converts a quantity to move into trips and haul time for one carrier:
//!
//! ```text
//! trips           = ceil(quantity / capacity_per_trip)
//! time_per_trip   = (one_way_distance × 2) / speed
//! total_time      = trips × time_per_trip
//! normalized_time = total_time × 30 / one_way_distance
//! ```
//!
//! Distances are metres and speeds metres per hour, so times are hours.
//! Nothing to move, no distance, or no usable capacity all mean "transport
//! not applicable" and produce [`TransportEstimate::zero`].
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::transport::transport_time;
//!
//! // 10 t on a 2 t carrier at 4000 m/h over 100 m
//! let estimate = transport_time(10.0, 2.0, 4000.0, 100.0);
//! assert_eq!(estimate.trips, 5);
//! assert!((estimate.total_time_h - 0.25).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::breakdown::TaskBreakdownItem;
use crate::errors::{CalcError, CalcResult, FallbackWarning};
use crate::rates::{MaterialType, RateTables};
use crate::units::{checked_div, round2, Measure};

/// Reference haul distance for [`TransportEstimate::normalized_time_h`] (m)
pub const NORMALIZED_REFERENCE_DISTANCE_M: f64 = 30.0;

/// Trips and times for one haul.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransportEstimate {
    pub trips: u32,
    pub time_per_trip_h: f64,
    pub total_time_h: f64,
    /// Total time rescaled as if the haul were 30 m one way
    pub normalized_time_h: f64,
}

impl TransportEstimate {
    pub fn zero() -> Self {
        TransportEstimate::default()
    }

    pub fn is_zero(&self) -> bool {
        self.trips == 0
    }
}

/// Pure transport time with capacity and speed already resolved.
pub fn transport_time(
    quantity: f64,
    capacity_per_trip: f64,
    speed_m_per_hour: f64,
    one_way_distance_m: f64,
) -> TransportEstimate {
    if !is_positive(quantity) || !is_positive(one_way_distance_m) || !one_way_distance_m.is_finite() {
        return TransportEstimate::zero();
    }
    let Some(trips_exact) = checked_div(quantity, capacity_per_trip).filter(|t| *t > 0.0) else {
        return TransportEstimate::zero();
    };
    let Some(time_per_trip_h) = checked_div(one_way_distance_m * 2.0, speed_m_per_hour).filter(|t| *t > 0.0) else {
        return TransportEstimate::zero();
    };

    let trips = trips_exact.ceil().max(1.0);
    let total_time_h = trips * time_per_trip_h;
    let normalized_time_h = total_time_h * NORMALIZED_REFERENCE_DISTANCE_M / one_way_distance_m;

    TransportEstimate {
        trips: trips.min(u32::MAX as f64) as u32,
        time_per_trip_h,
        total_time_h,
        normalized_time_h,
    }
}

// NaN-safe "> 0"
fn is_positive(value: f64) -> bool {
    value > 0.0
}

/// Carrier and haul distance chosen by the user.
///
/// ## JSON Example
///
/// ```json
/// { "carrier_size_class": 1.0, "one_way_distance_m": "25" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportOptions {
    /// Carrier nominal payload in tonnes
    pub carrier_size_class: Measure,

    /// One-way haul distance in metres; zero disables transport
    pub one_way_distance_m: Measure,
}

impl TransportOptions {
    pub fn new(carrier_size_class: f64, one_way_distance_m: f64) -> Self {
        TransportOptions {
            carrier_size_class: carrier_size_class.into(),
            one_way_distance_m: one_way_distance_m.into(),
        }
    }

    /// Validate into numbers. Distance may be zero, never negative.
    pub fn resolve(&self) -> CalcResult<ResolvedTransport> {
        let size_class = self.carrier_size_class.positive("transport.carrier_size_class")?;
        let distance = self.one_way_distance_m.parse("transport.one_way_distance_m")?;
        if !distance.is_finite() || distance < 0.0 {
            return Err(CalcError::invalid_input(
                "transport.one_way_distance_m",
                distance.to_string(),
                "Distance must be zero or positive",
            ));
        }
        Ok(ResolvedTransport {
            carrier_size_class: size_class,
            one_way_distance_m: distance,
        })
    }
}

/// Validated [`TransportOptions`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTransport {
    pub carrier_size_class: f64,
    pub one_way_distance_m: f64,
}

/// Capacity the engine's calculators fall back to when the table has no
/// entry for a (material, carrier) pair: the carrier payload divided by the
/// material's nominal unit mass. Counted units are floored, minimum one.
pub fn fallback_capacity(material: MaterialType, size_class: f64) -> f64 {
    let per_trip = size_class * 1000.0 / nominal_unit_mass_kg(material);
    match material.unit() {
        "t" => per_trip,
        _ => per_trip.floor().max(1.0),
    }
}

fn nominal_unit_mass_kg(material: MaterialType) -> f64 {
    match material {
        MaterialType::Soil | MaterialType::Sand | MaterialType::Aggregate => 1000.0,
        MaterialType::Cement => 25.0,
        MaterialType::Kerbs => 80.0,
        MaterialType::Slabs => 50.0,
        MaterialType::Bricks => 3.3,
        MaterialType::Blocks => 17.0,
    }
}

/// One computed haul of one material category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportLeg {
    pub material: MaterialType,
    /// Amount moved, in the material's unit
    pub quantity: f64,
    pub carrier_size_class: f64,
    pub one_way_distance_m: f64,
    pub capacity_per_trip: f64,
    pub speed_m_per_hour: f64,
    pub estimate: TransportEstimate,
}

impl TransportLeg {
    pub fn task_name(&self) -> String {
        format!("Transport {}", self.material.code())
    }

    /// Breakdown line for this leg; `hours` is the total haul time
    pub fn to_task(&self) -> TaskBreakdownItem {
        TaskBreakdownItem::new(
            self.task_name(),
            self.estimate.total_time_h,
            round2(self.quantity),
            self.material.unit(),
        )
    }
}

/// Transport model bound to a set of rate tables.
#[derive(Debug, Clone, Copy)]
pub struct TransportModel<'a> {
    tables: &'a RateTables,
}

impl<'a> TransportModel<'a> {
    pub fn new(tables: &'a RateTables) -> Self {
        TransportModel { tables }
    }

    /// Estimate one leg.
    ///
    /// Returns `None` when there is nothing to move or no distance, without
    /// touching the tables. Configuration gaps are pushed onto `warnings`.
    pub fn leg(
        &self,
        material: MaterialType,
        quantity: f64,
        transport: ResolvedTransport,
        warnings: &mut Vec<FallbackWarning>,
    ) -> Option<TransportLeg> {
        if !is_positive(quantity) || !is_positive(transport.one_way_distance_m) {
            return None;
        }
        let size_class = transport.carrier_size_class;

        let capacity_per_trip = match self.tables.material_capacity(material, size_class) {
            Some(capacity) if capacity > 0.0 => capacity,
            _ => {
                let fallback = fallback_capacity(material, size_class);
                debug!(%material, size_class, fallback, "no capacity configured, using fallback");
                warnings.push(FallbackWarning::MissingCapacity {
                    material,
                    size_class,
                    fallback_capacity: fallback,
                });
                fallback
            }
        };

        let (speed_m_per_hour, speed_warning) = self.tables.carrier_speed_checked(size_class);
        if let Some(warning) = speed_warning {
            debug!(size_class, speed_m_per_hour, "no carrier speed configured, using default");
            warnings.push(warning);
        }

        let estimate = transport_time(quantity, capacity_per_trip, speed_m_per_hour, transport.one_way_distance_m);
        debug!(
            %material,
            quantity,
            trips = estimate.trips,
            total_time_h = estimate.total_time_h,
            "transport leg"
        );

        Some(TransportLeg {
            material,
            quantity,
            carrier_size_class: size_class,
            one_way_distance_m: transport.one_way_distance_m,
            capacity_per_trip,
            speed_m_per_hour,
            estimate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::{CarrierSpec, MaterialCapacityEntry};

    fn tables() -> RateTables {
        RateTables::new(
            vec![CarrierSpec::new(2.0, 4000.0)],
            vec![MaterialCapacityEntry::new(MaterialType::Soil, 2.0, 2.0)],
        )
    }

    #[test]
    fn test_reference_haul() {
        let estimate = transport_time(10.0, 2.0, 4000.0, 100.0);
        assert_eq!(estimate.trips, 5);
        assert!((estimate.time_per_trip_h - 0.05).abs() < 1e-12);
        assert!((estimate.total_time_h - 0.25).abs() < 1e-12);
        // 0.25 h × 30 / 100
        assert!((estimate.normalized_time_h - 0.075).abs() < 1e-12);
    }

    #[test]
    fn test_partial_trip_rounds_up() {
        assert_eq!(transport_time(10.1, 2.0, 4000.0, 100.0).trips, 6);
        assert_eq!(transport_time(0.01, 2.0, 4000.0, 100.0).trips, 1);
    }

    #[test]
    fn test_guards_return_zero() {
        assert!(transport_time(0.0, 2.0, 4000.0, 100.0).is_zero());
        assert!(transport_time(-1.0, 2.0, 4000.0, 100.0).is_zero());
        assert!(transport_time(10.0, 2.0, 4000.0, 0.0).is_zero());
        assert!(transport_time(10.0, 0.0, 4000.0, 100.0).is_zero());
        assert!(transport_time(10.0, 2.0, 0.0, 100.0).is_zero());
        assert!(transport_time(f64::NAN, 2.0, 4000.0, 100.0).is_zero());
    }

    #[test]
    fn test_model_uses_tables() {
        let tables = tables();
        let model = TransportModel::new(&tables);
        let mut warnings = Vec::new();
        let transport = ResolvedTransport {
            carrier_size_class: 2.0,
            one_way_distance_m: 100.0,
        };

        let leg = model.leg(MaterialType::Soil, 10.0, transport, &mut warnings).unwrap();
        assert_eq!(leg.estimate.trips, 5);
        assert!(warnings.is_empty());

        let task = leg.to_task();
        assert_eq!(task.name, "Transport soil");
        assert!((task.hours - 0.25).abs() < 1e-12);
        assert_eq!(task.unit, "t");
    }

    #[test]
    fn test_model_flags_gaps() {
        let tables = tables();
        let model = TransportModel::new(&tables);
        let mut warnings = Vec::new();
        let transport = ResolvedTransport {
            carrier_size_class: 1.0,
            one_way_distance_m: 50.0,
        };

        let leg = model.leg(MaterialType::Cement, 45.0, transport, &mut warnings).unwrap();
        // 1 t / 25 kg = 40 bags per trip, 4000 m/h default
        assert_eq!(leg.capacity_per_trip, 40.0);
        assert_eq!(leg.speed_m_per_hour, 4000.0);
        assert_eq!(leg.estimate.trips, 2);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_model_skips_empty_legs_without_lookups() {
        let empty = RateTables::default();
        let model = TransportModel::new(&empty);
        let mut warnings = Vec::new();
        let transport = ResolvedTransport {
            carrier_size_class: 1.0,
            one_way_distance_m: 0.0,
        };
        assert!(model.leg(MaterialType::Sand, 3.0, transport, &mut warnings).is_none());
        let transport = ResolvedTransport {
            carrier_size_class: 1.0,
            one_way_distance_m: 20.0,
        };
        assert!(model.leg(MaterialType::Sand, 0.0, transport, &mut warnings).is_none());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_fallback_capacity() {
        assert_eq!(fallback_capacity(MaterialType::Sand, 0.5), 0.5);
        assert_eq!(fallback_capacity(MaterialType::Cement, 1.0), 40.0);
        assert_eq!(fallback_capacity(MaterialType::Kerbs, 0.1), 1.0);
    }

    #[test]
    fn test_options_resolve() {
        let options = TransportOptions {
            carrier_size_class: "1".into(),
            one_way_distance_m: "0".into(),
        };
        let resolved = options.resolve().unwrap();
        assert_eq!(resolved.one_way_distance_m, 0.0);

        assert!(TransportOptions::new(1.0, -5.0).resolve().is_err());
        assert!(TransportOptions::new(0.0, 5.0).resolve().is_err());
    }
}
