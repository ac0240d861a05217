//! churnsim - Command Line Operations for Contract Churn Simulation
//!
//! This is the operational entry point for the contract churn Monte Carlo
//! simulator.
//!
//! # Commands
//!
//! - `churnsim simulate --scenario base` - Run the simulation and print the risk report
//! - `churnsim sensitivity` - Sweep the assumption grid and report P10 EBITDA per cell
//! - `churnsim scenarios` - List the scenarios defined in the configuration
//! - `churnsim check` - Validate the configuration file
//!
//! # Architecture
//!
//! The binary orchestrates the `churn_core` and `churn_sim` crates: it owns
//! file I/O, scenario lookup, and report formatting, while all simulation
//! semantics live in the libraries.

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod export;
mod report;

pub use error::{CliError, Result};

/// Contract churn Monte Carlo simulator CLI
#[derive(Parser)]
#[command(name = "churnsim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config/churnsim.json")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Monte Carlo simulation and print the risk report
    Simulate {
        /// Scenario name from the configuration
        #[arg(short, long, default_value = "base")]
        scenario: String,

        /// Number of Monte Carlo runs (overrides the configured default)
        #[arg(short, long)]
        runs: Option<usize>,

        /// Random seed for reproducibility (overrides the configured default)
        #[arg(long)]
        seed: Option<u64>,

        /// Two EBITDA thresholds, e.g. --thresholds 1000000 800000
        #[arg(long, num_args = 2, value_names = ["CURRENT", "STRESS"])]
        thresholds: Option<Vec<f64>>,

        /// Optional path to export run-level results as CSV
        #[arg(long)]
        export_csv: Option<String>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Sweep the assumption grid and report P10 EBITDA per cell
    Sensitivity {
        /// Scenario name from the configuration
        #[arg(short, long, default_value = "base")]
        scenario: String,

        /// Number of Monte Carlo runs per cell (overrides the configured default)
        #[arg(short, long)]
        runs: Option<usize>,

        /// Random seed shared by every cell (overrides the configured default)
        #[arg(long)]
        seed: Option<u64>,

        /// Optional path to export the sweep as CSV
        #[arg(long)]
        export_csv: Option<String>,
    },

    /// List the scenarios defined in the configuration
    Scenarios,

    /// Validate the configuration file
    Check,
}

fn main() {
    // Initialise tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Simulate {
            scenario,
            runs,
            seed,
            thresholds,
            export_csv,
            format,
        } => commands::simulate::run(
            &cli.config,
            &scenario,
            runs,
            seed,
            thresholds.as_deref(),
            export_csv.as_deref(),
            &format,
        ),
        Commands::Sensitivity {
            scenario,
            runs,
            seed,
            export_csv,
        } => commands::sensitivity::run(&cli.config, &scenario, runs, seed, export_csv.as_deref()),
        Commands::Scenarios => commands::scenarios::run(&cli.config),
        Commands::Check => commands::check::run(&cli.config),
    }
}
