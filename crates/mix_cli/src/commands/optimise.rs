//! Optimise command implementation
//!
//! Runs the grid search for one scenario and prints the management report:
//! the optimal mix, the scenario comparison table, and the takeaways.

use mix_optimiser::optimise;
use tracing::info;

use crate::{config, report, CliError, Result};

/// Run the optimise command
pub fn run(config_path: &str, scenario: &str, format: &str) -> Result<()> {
    if !matches!(format, "table" | "json") {
        return Err(CliError::InvalidArgument(format!(
            "Unknown format: {format}. Supported: table, json"
        )));
    }

    let config = config::load(config_path)?;
    let resolved = config.resolve(scenario)?;

    info!("Starting optimisation...");
    info!("  Scenario: {}", scenario);
    info!("  Step: {} BBL", resolved.bbl_step);
    info!("  Capacity: {} BBL", resolved.anchors.facility_capacity_bbl);

    let outcome = optimise(&resolved)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        _ => {
            println!("{}", report::primary_block(&outcome));
            println!();
            println!("Scenario comparison:");
            println!("{}", report::scenario_table(&config)?);
            println!();
            println!("VP-ready insights:");
            for bullet in report::insights(&config, &outcome)? {
                println!("- {bullet}");
            }
        }
    }

    info!("Optimisation complete");
    Ok(())
}
