//! CLI definition using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "estimate_cli")]
#[command(version)]
#[command(about = "Groundwork estimation: quantities, labor hours and haulage from site measurements")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Company configuration (TOML or JSON): carriers, capacities, rate catalog
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Debug logging (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run calculation requests from a JSON file
    Estimate {
        /// JSON file with one request object or a list of them
        request: PathBuf,

        /// Match every breakdown line against the rate catalog
        #[arg(long)]
        reconcile: bool,
    },

    /// Find the rate template for a task name
    Match {
        /// Task name, e.g. "cutting slabs"
        task: String,

        /// Parent task name, used to specialise generic cutting tasks
        #[arg(long, short = 'p')]
        parent: Option<String>,
    },

    /// Print the carrier and capacity tables in effect
    Tables,
}
