//! # Task Breakdown
//!
//! The common output shape every calculator converts into at the boundary:
//! an [`Estimate`] holding the physical quantity, an ordered list of
//! [`TaskBreakdownItem`]s and a list of [`MaterialLine`]s.
//!
//! [`assemble`] fixes the ordering: primary task first, then transport legs
//! in the order their materials were computed, then trailing tasks such as
//! base preparation. Legs with no time are dropped; names are never
//! deduplicated.
//!
//! ## JSON Example
//!
//! The reference trench dug by hand, soil hauled 50 m on a 1 t dumper
//! (9 trips at 0.02 h):
//!
//! ```json
//! {
//!   "quantity": { "quantity": 5.4, "unit": "m3" },
//!   "task_breakdown": [
//!     { "name": "Excavating foundation with shovel", "hours": 12.0, "amount": 5.4, "unit": "m3" },
//!     { "name": "Transport soil", "hours": 0.18, "amount": 8.1, "unit": "t" }
//!   ],
//!   "materials": [
//!     { "name": "Excavated soil", "quantity": 8.1, "unit": "t" }
//!   ],
//!   "warnings": []
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::FallbackWarning;

/// Physical output of a calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityResult {
    pub quantity: f64,
    pub unit: String,
}

impl QuantityResult {
    /// Negative or NaN quantities are clamped to zero
    pub fn new(quantity: f64, unit: impl Into<String>) -> Self {
        QuantityResult {
            quantity: if quantity > 0.0 { quantity } else { 0.0 },
            unit: unit.into(),
        }
    }
}

/// Amount column of a breakdown line: usually a number, occasionally a
/// label such as "2 x 15"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Number(value)
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Text(value.to_string())
    }
}

impl From<String> for Amount {
    fn from(value: String) -> Self {
        Amount::Text(value)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Amount::Number(n) => write!(f, "{}", n),
            Amount::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One labor line in a task breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskBreakdownItem {
    pub name: String,
    pub hours: f64,
    pub amount: Amount,
    pub unit: String,
    /// Set only by template reconciliation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

impl TaskBreakdownItem {
    pub fn new(name: impl Into<String>, hours: f64, amount: impl Into<Amount>, unit: impl Into<String>) -> Self {
        TaskBreakdownItem {
            name: name.into(),
            hours,
            amount: amount.into(),
            unit: unit.into(),
            template_id: None,
        }
    }

    /// Copy with a different name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        TaskBreakdownItem {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Copy carrying a reconciled template id
    pub fn with_template(&self, template_id: impl Into<String>) -> Self {
        TaskBreakdownItem {
            template_id: Some(template_id.into()),
            ..self.clone()
        }
    }
}

/// One material requirement.
///
/// Price fields are never computed by the engine; an external price lookup
/// fills them through [`MaterialLine::priced`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_unit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
}

impl MaterialLine {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        MaterialLine {
            name: name.into(),
            quantity,
            unit: unit.into(),
            price_per_unit: None,
            total_price: None,
        }
    }

    /// Copy with a unit price and the resulting total
    pub fn priced(&self, price_per_unit: f64) -> Self {
        MaterialLine {
            price_per_unit: Some(price_per_unit),
            total_price: Some(self.quantity * price_per_unit),
            ..self.clone()
        }
    }
}

/// Everything a calculator hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub quantity: QuantityResult,
    pub task_breakdown: Vec<TaskBreakdownItem>,
    pub materials: Vec<MaterialLine>,
    /// Configuration gaps the engine worked around
    #[serde(default)]
    pub warnings: Vec<FallbackWarning>,
}

impl Estimate {
    /// Sum of hours over all breakdown lines
    pub fn total_hours(&self) -> f64 {
        self.task_breakdown.iter().map(|t| t.hours).sum()
    }

    /// Lines fit for persistence (hours > 0)
    pub fn billable_tasks(&self) -> impl Iterator<Item = &TaskBreakdownItem> {
        self.task_breakdown.iter().filter(|t| t.hours > 0.0)
    }
}

/// Merge a primary task, transport legs and trailing tasks into one
/// ordered breakdown.
///
/// Transport legs with `hours <= 0` (or NaN) are omitted rather than
/// emitted as zero-hour lines.
pub fn assemble(
    primary: TaskBreakdownItem,
    transport_legs: Vec<TaskBreakdownItem>,
    extra_tasks: Vec<TaskBreakdownItem>,
) -> Vec<TaskBreakdownItem> {
    let mut tasks = Vec::with_capacity(1 + transport_legs.len() + extra_tasks.len());
    tasks.push(primary);
    tasks.extend(transport_legs.into_iter().filter(|leg| leg.hours > 0.0));
    tasks.extend(extra_tasks);
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str, hours: f64) -> TaskBreakdownItem {
        TaskBreakdownItem::new(name, hours, 1.0, "m")
    }

    #[test]
    fn test_assemble_ordering() {
        let tasks = assemble(
            task("Laying kerbs", 4.0),
            vec![task("Transport kerbs", 0.5), task("Transport sand", 0.2)],
            vec![task("Preparing base for kerbs", 1.0)],
        );
        let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Laying kerbs", "Transport kerbs", "Transport sand", "Preparing base for kerbs"]
        );
    }

    #[test]
    fn test_assemble_drops_empty_legs() {
        let tasks = assemble(
            task("Mixing mortar", 1.0),
            vec![task("Transport sand", 0.0), task("Transport cement", 0.1), task("Transport x", f64::NAN)],
            vec![],
        );
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].name, "Transport cement");
    }

    #[test]
    fn test_assemble_keeps_duplicate_names() {
        let tasks = assemble(
            task("Haul", 1.0),
            vec![task("Transport sand", 0.1), task("Transport sand", 0.1)],
            vec![],
        );
        assert_eq!(tasks.len(), 3);
    }

    #[test]
    fn test_copy_and_replace() {
        let original = task("cutting slabs", 2.0);
        let renamed = original.renamed("cutting porcelain");
        let linked = renamed.with_template("tpl-7");
        assert_eq!(original.name, "cutting slabs");
        assert!(original.template_id.is_none());
        assert_eq!(linked.name, "cutting porcelain");
        assert_eq!(linked.template_id.as_deref(), Some("tpl-7"));
    }

    #[test]
    fn test_material_pricing() {
        let line = MaterialLine::new("Cement", 4.0, "bags");
        let priced = line.priced(6.5);
        assert!(line.total_price.is_none());
        assert_eq!(priced.total_price, Some(26.0));
    }

    #[test]
    fn test_quantity_never_negative() {
        assert_eq!(QuantityResult::new(-1.0, "m3").quantity, 0.0);
        assert_eq!(QuantityResult::new(f64::NAN, "m3").quantity, 0.0);
    }

    #[test]
    fn test_amount_serialization() {
        let number = serde_json::to_string(&Amount::from(2.5)).unwrap();
        let text = serde_json::to_string(&Amount::from("2 x 15")).unwrap();
        assert_eq!(number, "2.5");
        assert_eq!(text, "\"2 x 15\"");
    }

    #[test]
    fn test_estimate_totals() {
        let estimate = Estimate {
            quantity: QuantityResult::new(5.0, "m"),
            task_breakdown: vec![task("a", 1.5), task("b", 0.0), task("c", 2.0)],
            materials: vec![],
            warnings: vec![],
        };
        assert!((estimate.total_hours() - 3.5).abs() < 1e-12);
        assert_eq!(estimate.billable_tasks().count(), 2);
    }
}
