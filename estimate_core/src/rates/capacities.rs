//! Load capacity per trip by (material, carrier size class)
//!
//! Capacities are expressed in the material's own unit (see
//! [`MaterialType::unit`]). A missing pair is a configuration gap; the
//! lookup returns `None` and the caller decides the fallback.

use serde::{Deserialize, Serialize};

use super::carriers::SIZE_CLASS_EPSILON;
use super::MaterialType;

/// One row of the capacity table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCapacityEntry {
    pub material: MaterialType,
    /// Carrier nominal payload in tonnes
    pub size_class: f64,
    /// Amount moved per trip, in the material's unit
    pub capacity: f64,
}

impl MaterialCapacityEntry {
    pub fn new(material: MaterialType, size_class: f64, capacity: f64) -> Self {
        MaterialCapacityEntry {
            material,
            size_class,
            capacity,
        }
    }
}

/// Exact lookup of a capacity; first matching row wins
pub fn capacity_for(entries: &[MaterialCapacityEntry], material: MaterialType, size_class: f64) -> Option<f64> {
    entries
        .iter()
        .find(|e| e.material == material && (e.size_class - size_class).abs() < SIZE_CLASS_EPSILON)
        .map(|e| e.capacity)
}
