//! Check command implementation
//!
//! Loads and validates the configuration file, then prints a short summary
//! of what it defines. Exits non-zero on any validation failure.

use tracing::info;

use crate::{config, Result};

/// Run the check command
pub fn run(config_path: &str) -> Result<()> {
    info!("Checking configuration...");
    info!("  Path: {}", config_path);

    let config = config::load(config_path)?;

    println!("Configuration OK: {config_path}");
    println!("  Scenarios: {}", config.scenario_names().join(", "));
    println!("  Step: {} BBL", config.optimisation.bbl_step);
    println!(
        "  Capacity: {} BBL volume, {:.0} canning hours",
        config.case_anchors.facility_capacity_bbl,
        config.assumptions.canning.canning_hours_capacity,
    );

    Ok(())
}
