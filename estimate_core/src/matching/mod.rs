//! # Template Reconciliation
//!
//! Maps a calculator's free-text task name onto a company rate template so
//! the task picks up authoritative hours per unit and a stable template id.
//!
//! Matching runs an ordered chain of [`MatchRule`]s and stops at the first
//! rule that accepts some template:
//!
//! 1. **exact** - case-insensitive equality
//! 2. **domain-specific** - material-specific "cutting" variants
//! 3. **word-order** - task words found in order inside the template name
//! 4. **partial** - significant words overlap (last resort, logged)
//!
//! Within a rule the catalog is scanned in its given order, so the result
//! is deterministic for a fixed catalog.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::matching::{match_template, MatchStrategy, RateTemplate};
//!
//! let catalog = vec![
//!     RateTemplate::new("t1", "Cutting sandstone slabs", "m", Some(0.2)),
//!     RateTemplate::new("t2", "Cutting porcelain tiles", "m", Some(0.35)),
//! ];
//!
//! let result = match_template("cutting porcelain", &catalog);
//! assert_eq!(result.strategy, MatchStrategy::DomainSpecific);
//! assert_eq!(result.template.unwrap().id, "t2");
//! ```

pub mod rules;

pub use rules::{DomainSpecificRule, ExactRule, MatchRule, PartialRule, WordOrderRule};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::breakdown::TaskBreakdownItem;

static DEFAULT_MATCHER: Lazy<TemplateMatcher> = Lazy::new(TemplateMatcher::default);

/// Parent-task keywords that select a material-specific cutting template
pub const CUTTING_MATERIALS: [&str; 3] = ["porcelain", "sandstone", "granite"];

/// A company rate template (read-only catalog entry).
///
/// ## JSON Example
///
/// ```json
/// { "id": "tpl-42", "name": "Laying KL kerbs", "unit": "m", "estimatedHoursPerUnit": 0.25 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTemplate {
    pub id: String,
    pub name: String,
    pub unit: String,
    #[serde(default, alias = "estimatedHoursPerUnit")]
    pub estimated_hours_per_unit: Option<f64>,
}

impl RateTemplate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
        estimated_hours_per_unit: Option<f64>,
    ) -> Self {
        RateTemplate {
            id: id.into(),
            name: name.into(),
            unit: unit.into(),
            estimated_hours_per_unit,
        }
    }

    /// Hours per unit when set to a usable positive value
    pub fn positive_hours(&self) -> Option<f64> {
        self.estimated_hours_per_unit
            .filter(|h| h.is_finite() && *h > 0.0)
    }
}

/// Which rule produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
    Exact,
    DomainSpecific,
    WordOrder,
    Partial,
    None,
}

impl MatchStrategy {
    pub fn code(&self) -> &'static str {
        match self {
            MatchStrategy::Exact => "exact",
            MatchStrategy::DomainSpecific => "domain-specific",
            MatchStrategy::WordOrder => "word-order",
            MatchStrategy::Partial => "partial",
            MatchStrategy::None => "none",
        }
    }
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Outcome of matching one task name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub template: Option<RateTemplate>,
    pub strategy: MatchStrategy,
}

impl MatchResult {
    pub fn none() -> Self {
        MatchResult {
            template: None,
            strategy: MatchStrategy::None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.template.is_some()
    }
}

/// Lowercased, whitespace-collapsed name and its words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    pub text: String,
    pub words: Vec<String>,
}

impl NormalizedName {
    pub fn new(raw: &str) -> Self {
        let words: Vec<String> = raw.split_whitespace().map(str::to_lowercase).collect();
        NormalizedName {
            text: words.join(" "),
            words,
        }
    }
}

/// Ordered chain of matching rules.
pub struct TemplateMatcher {
    rules: Vec<Box<dyn MatchRule>>,
}

impl Default for TemplateMatcher {
    fn default() -> Self {
        TemplateMatcher::with_rules(vec![
            Box::new(ExactRule),
            Box::new(DomainSpecificRule),
            Box::new(WordOrderRule),
            Box::new(PartialRule),
        ])
    }
}

impl std::fmt::Debug for TemplateMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let strategies: Vec<&str> = self.rules.iter().map(|r| r.strategy().code()).collect();
        f.debug_struct("TemplateMatcher").field("rules", &strategies).finish()
    }
}

impl TemplateMatcher {
    pub fn with_rules(rules: Vec<Box<dyn MatchRule>>) -> Self {
        TemplateMatcher { rules }
    }

    /// Strategies in the order they are tried
    pub fn strategies(&self) -> Vec<MatchStrategy> {
        self.rules.iter().map(|r| r.strategy()).collect()
    }

    /// Find the template for `task_name`, trying each rule over the whole
    /// catalog before moving on to the next rule.
    pub fn find<'c>(&self, task_name: &str, catalog: &'c [RateTemplate]) -> Option<(&'c RateTemplate, MatchStrategy)> {
        let task = NormalizedName::new(task_name);
        let names: Vec<NormalizedName> = catalog.iter().map(|t| NormalizedName::new(&t.name)).collect();

        for rule in &self.rules {
            let hit = catalog
                .iter()
                .zip(&names)
                .find(|(_, name)| rule.matches(&task, name));
            if let Some((template, _)) = hit {
                let strategy = rule.strategy();
                if strategy == MatchStrategy::Partial {
                    warn!(
                        task = task_name,
                        template = %template.name,
                        template_id = %template.id,
                        "rate template matched by partial word overlap only"
                    );
                } else {
                    debug!(task = task_name, template = %template.name, %strategy, "rate template matched");
                }
                return Some((template, strategy));
            }
        }

        debug!(task = task_name, catalog_size = catalog.len(), "no rate template matched");
        None
    }

    /// As [`find`](Self::find), returning an owned [`MatchResult`]
    pub fn match_template(&self, task_name: &str, catalog: &[RateTemplate]) -> MatchResult {
        match self.find(task_name, catalog) {
            Some((template, strategy)) => MatchResult {
                template: Some(template.clone()),
                strategy,
            },
            None => MatchResult::none(),
        }
    }
}

/// Match with the standard rule chain
pub fn match_template(task_name: &str, catalog: &[RateTemplate]) -> MatchResult {
    DEFAULT_MATCHER.match_template(task_name, catalog)
}

/// Borrowing variant of [`match_template`] with the standard rule chain
pub fn find_template<'c>(task_name: &str, catalog: &'c [RateTemplate]) -> Option<(&'c RateTemplate, MatchStrategy)> {
    DEFAULT_MATCHER.find(task_name, catalog)
}

/// Rename a generic cutting task after the material named by its parent.
///
/// "cutting slabs" under a parent task "Porcelain patio 40 m2" becomes
/// "cutting porcelain", which the domain-specific rule can then resolve.
/// Tasks without "cutting", or parents without a known material, are
/// returned unchanged.
pub fn contextualize_cutting_task(task_name: &str, parent_name: &str) -> String {
    if !task_name.to_lowercase().contains(rules::CUTTING_KEYWORD) {
        return task_name.to_string();
    }
    let parent = parent_name.to_lowercase();
    CUTTING_MATERIALS
        .iter()
        .find(|material| parent.contains(*material))
        .map(|material| format!("{} {}", rules::CUTTING_KEYWORD, material))
        .unwrap_or_else(|| task_name.to_string())
}

/// A breakdown line after reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledTask {
    /// The line, carrying `template_id` when a template matched
    pub item: TaskBreakdownItem,
    pub strategy: MatchStrategy,
    /// Template hours per unit; 0 when unmatched or unset
    pub estimated_hours_per_unit: f64,
}

/// Reconcile every line against the catalog. Unmatched lines are kept
/// with `estimated_hours_per_unit = 0`.
pub fn reconcile(items: &[TaskBreakdownItem], catalog: &[RateTemplate]) -> Vec<ReconciledTask> {
    items
        .iter()
        .map(|item| match find_template(&item.name, catalog) {
            Some((template, strategy)) => ReconciledTask {
                item: item.with_template(template.id.clone()),
                strategy,
                estimated_hours_per_unit: template.estimated_hours_per_unit.unwrap_or(0.0),
            },
            None => ReconciledTask {
                item: item.clone(),
                strategy: MatchStrategy::None,
                estimated_hours_per_unit: 0.0,
            },
        })
        .collect()
}
