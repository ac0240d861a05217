//! mixopt - Command Line Operations for Production Mix Planning
//!
//! This is the operational entry point for the branded/contract mix
//! optimiser.
//!
//! # Commands
//!
//! - `mixopt optimise --scenario base` - Optimise one scenario and print the mix report
//! - `mixopt sensitivity` - One-way sensitivity over the configured candidate values
//! - `mixopt scenarios` - List the scenarios defined in the configuration
//! - `mixopt check` - Validate the configuration file
//!
//! # Architecture
//!
//! The binary orchestrates the `mix_optimiser` crate: it owns file I/O and
//! report formatting, while the grid search and scenario resolution live in
//! the library.

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod report;

pub use error::{CliError, Result};

/// Branded/contract mix optimiser CLI
#[derive(Parser)]
#[command(name = "mixopt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config/mixopt.json")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimise one scenario and print the mix report
    Optimise {
        /// Scenario name from the configuration
        #[arg(short, long, default_value = "base")]
        scenario: String,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// One-way sensitivity over the configured candidate values
    Sensitivity {
        /// Scenario name from the configuration
        #[arg(short, long, default_value = "base")]
        scenario: String,
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
        Commands::Optimise { scenario, format } => {
            commands::optimise::run(&cli.config, &scenario, &format)
        }
        Commands::Sensitivity { scenario } => commands::sensitivity::run(&cli.config, &scenario),
        Commands::Scenarios => commands::scenarios::run(&cli.config),
        Commands::Check => commands::check::run(&cli.config),
    }
}
