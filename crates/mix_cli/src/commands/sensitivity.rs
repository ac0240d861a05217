//! Sensitivity command implementation
//!
//! Re-optimises one scenario once per candidate value in the configured
//! sensitivity lists and prints the resulting table.

use mix_optimiser::run_one_way;
use tracing::info;

use crate::{config, report, Result};

/// Run the sensitivity command
pub fn run(config_path: &str, scenario: &str) -> Result<()> {
    let config = config::load(config_path)?;

    info!("Starting one-way sensitivity...");
    info!("  Scenario: {}", scenario);

    let rows = run_one_way(&config, scenario)?;

    println!("Sensitivity (one-way):");
    println!("{}", report::sensitivity_table(&rows));

    info!("Sensitivity complete ({} rows)", rows.len());
    Ok(())
}
