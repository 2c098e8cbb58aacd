//! Turning calculator outcomes into terminal tables or JSON.

use serde::Serialize;
use serde_json::Value;

use estimate_core::matching::{contextualize_cutting_task, reconcile, ReconciledTask};
use estimate_core::{CalcError, CalcResult, CalculationInput, Estimate, EstimationConfig, MatchResult, RateTables};

/// One entry of a request file. Entries that fail to decode are kept so
/// they get a report of their own.
#[derive(Debug)]
pub struct Request {
    pub label: String,
    pub calc_type: String,
    pub input: CalcResult<CalculationInput>,
}

impl Request {
    pub fn from_value(value: Value) -> Self {
        let text = |key: &str, default: &str| value.get(key).and_then(Value::as_str).unwrap_or(default).to_string();
        let label = text("label", "(unlabelled)");
        let calc_type = text("type", "unknown");
        Request {
            label,
            calc_type,
            input: CalculationInput::from_json_value(value),
        }
    }
}

impl From<CalculationInput> for Request {
    fn from(input: CalculationInput) -> Self {
        Request {
            label: input.label().to_string(),
            calc_type: input.calc_type().to_string(),
            input: Ok(input),
        }
    }
}

/// One request's outcome
#[derive(Debug, Serialize)]
pub struct EstimateReport {
    pub label: String,
    pub calc_type: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Ok {
        estimate: Estimate,
        #[serde(skip_serializing_if = "Option::is_none")]
        reconciliation: Option<Vec<ReconciledTask>>,
    },
    Error {
        error: CalcError,
    },
}

impl EstimateReport {
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, Outcome::Ok { .. })
    }
}

/// Run every request; failures are reported per request, not raised
pub fn run_requests(requests: &[Request], config: &EstimationConfig, with_reconcile: bool) -> Vec<EstimateReport> {
    requests
        .iter()
        .map(|request| {
            let result = match &request.input {
                Ok(input) => input.estimate(config),
                Err(error) => Err(error.clone()),
            };
            let outcome = match result {
                Ok(estimate) => {
                    let reconciliation = with_reconcile.then(|| reconcile(&estimate.task_breakdown, &config.catalog));
                    Outcome::Ok {
                        estimate,
                        reconciliation,
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        label = %request.label,
                        code = error.error_code(),
                        "request failed: {}",
                        error
                    );
                    Outcome::Error { error }
                }
            };
            EstimateReport {
                label: request.label.clone(),
                calc_type: request.calc_type.clone(),
                outcome,
            }
        })
        .collect()
}

/// Match a single task, optionally specialised by its parent task
pub fn match_task(task: &str, parent: Option<&str>, config: &EstimationConfig) -> (String, MatchResult) {
    let task_name = match parent {
        Some(parent) => contextualize_cutting_task(task, parent),
        None => task.to_string(),
    };
    let result = estimate_core::match_template(&task_name, &config.catalog);
    (task_name, result)
}

// ============================================================================
// Table output
// ============================================================================

const RULE: &str = "═══════════════════════════════════════════════════════════";

pub fn print_reports(reports: &[EstimateReport]) {
    for report in reports {
        println!("{}", RULE);
        println!("  {} [{}]", report.label, report.calc_type);
        println!("{}", RULE);

        match &report.outcome {
            Outcome::Ok {
                estimate,
                reconciliation,
            } => {
                println!(
                    "Quantity: {} {}",
                    estimate.quantity.quantity, estimate.quantity.unit
                );
                println!();
                println!("Tasks:");
                for task in &estimate.task_breakdown {
                    println!(
                        "  {:<36} {:>8.2} h  {:>10} {}",
                        task.name,
                        task.hours,
                        task.amount.to_string(),
                        task.unit
                    );
                }
                println!("  {:<36} {:>8.2} h", "Total", estimate.total_hours());

                if !estimate.materials.is_empty() {
                    println!();
                    println!("Materials:");
                    for material in &estimate.materials {
                        println!("  {:<36} {:>10} {}", material.name, material.quantity, material.unit);
                    }
                }

                if let Some(lines) = reconciliation {
                    println!();
                    println!("Rate templates:");
                    for line in lines {
                        println!(
                            "  {:<36} {:<16} {:<12} {}",
                            line.item.name,
                            line.item.template_id.as_deref().unwrap_or("-"),
                            line.strategy,
                            status_icon(line.item.template_id.is_some())
                        );
                    }
                }

                if !estimate.warnings.is_empty() {
                    println!();
                    println!("Built-in defaults used:");
                    for warning in &estimate.warnings {
                        println!("  - {}", warning);
                    }
                }
            }
            Outcome::Error { error } => {
                println!("Error: {}", error);
            }
        }
        println!();
    }

    let failed = reports.iter().filter(|r| !r.is_ok()).count();
    println!(
        "RESULT: {} request(s), {} ok, {} failed",
        reports.len(),
        reports.len() - failed,
        failed
    );
}

pub fn print_match(task_name: &str, result: &MatchResult) {
    println!("Task:     {}", task_name);
    match &result.template {
        Some(template) => {
            println!("Template: {} ({})", template.name, template.id);
            println!("Strategy: {}", result.strategy);
            if let Some(hours) = template.estimated_hours_per_unit {
                println!("Rate:     {} h/{}", hours, template.unit);
            }
        }
        None => println!("Template: none {}", status_icon(false)),
    }
}

pub fn print_tables(tables: &RateTables) {
    println!("Carriers:");
    for carrier in &tables.carriers {
        println!(
            "  {:>5} t  {:<16} {:>6} m/h",
            carrier.size_class,
            carrier.display_name(),
            carrier.speed_m_per_hour
        );
    }
    println!();
    println!("Capacities per trip:");
    for entry in &tables.capacities {
        println!(
            "  {:<10} {:>5} t  {:>6} {}",
            entry.material.code(),
            entry.size_class,
            entry.capacity,
            entry.material.unit()
        );
    }
}

fn status_icon(ok: bool) -> &'static str {
    if ok { "[OK]" } else { "[--]" }
}
