//! # Groundwork CLI
//!
//! Runs estimation requests from JSON files against the built-in rate tables
//! or a company configuration, and looks up rate templates for task names.
//!
//! ```text
//! estimate_cli estimate demos/driveway.json --config demos/company.toml --reconcile
//! estimate_cli match "cutting slabs" --parent "Porcelain patio" -c demos/company.toml
//! estimate_cli tables --format json
//! ```

mod cli;
mod logging;
mod report;

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::info;

use estimate_core::{load_config, EstimationConfig};

use cli::{Cli, Commands, OutputFormat};
use report::Request;

/// A request file holds one calculation or a list of them. Each entry is
/// decoded on its own so one bad entry does not hide the others.
fn parse_requests(text: &str) -> Result<Vec<Request>> {
    let value: Value = serde_json::from_str(text).context("request file is not valid JSON")?;
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(_) => vec![value],
        _ => bail!("expected a calculation object or a list of them"),
    };
    Ok(entries.into_iter().map(Request::from_value).collect())
}

fn load_requests(path: &Path) -> Result<Vec<Request>> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read request file {}", path.display()))?;
    parse_requests(&text).with_context(|| format!("invalid request file {}", path.display()))
}

fn resolve_config(path: Option<&Path>) -> Result<EstimationConfig> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => {
            info!("no config given, using built-in rate tables and an empty catalog");
            Ok(EstimationConfig::default())
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = resolve_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Estimate { request, reconcile } => {
            let requests = load_requests(&request)?;
            info!(count = requests.len(), reconcile, "running requests");
            let reports = report::run_requests(&requests, &config, reconcile);

            match cli.format {
                OutputFormat::Table => report::print_reports(&reports),
                OutputFormat::Json => print_json(&reports)?,
            }

            let failed = reports.iter().filter(|r| !r.is_ok()).count();
            if failed > 0 {
                bail!("{} of {} requests failed", failed, reports.len());
            }
        }
        Commands::Match { task, parent } => {
            let (task_name, result) = report::match_task(&task, parent.as_deref(), &config);
            match cli.format {
                OutputFormat::Table => report::print_match(&task_name, &result),
                OutputFormat::Json => print_json(&result)?,
            }
        }
        Commands::Tables => match cli.format {
            OutputFormat::Table => report::print_tables(&config.tables),
            OutputFormat::Json => print_json(&config.tables)?,
        },
    }

    Ok(())
}
