//! Scenarios command implementation
//!
//! Lists the scenarios defined in the configuration file with the canning
//! assumptions each one resolves to.

use crate::{config, Result};

/// Run the scenarios command
pub fn run(config_path: &str) -> Result<()> {
    let config = config::load(config_path)?;

    println!("Configured scenarios:");
    for name in config.scenario_names() {
        let resolved = config.resolve(&name)?;
        let canning = resolved.assumptions.canning;
        println!(
            "  {name}: changeover {:.1} h/run, avg run {:.0} BBL, canning cap {:.0} h",
            canning.changeover_hours_per_run,
            canning.avg_run_size_bbl,
            canning.canning_hours_capacity,
        );
    }

    Ok(())
}
