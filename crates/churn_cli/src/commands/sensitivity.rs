//! Sensitivity command implementation
//!
//! Sweeps the standard assumption grid around one scenario and prints the
//! per-cell P10 EBITDA table, worst cell first.

use churn_sim::{run_sensitivity, SweepDims};
use tracing::info;

use crate::config::AppConfig;
use crate::{export, report, Result};

/// Run the sensitivity command
pub fn run(
    config_path: &str,
    scenario_arg: &str,
    runs: Option<usize>,
    seed: Option<u64>,
    export_csv: Option<&str>,
) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    let (scenario_name, scenario) = config.resolve_scenario(scenario_arg)?;
    let settings = config.settings_with(runs, seed);
    let dims = SweepDims::default();

    info!("Starting sensitivity sweep...");
    info!("  Scenario: {}", scenario_name);
    info!("  Cells: {}", dims.cell_count());
    info!("  Runs per cell: {}", settings.runs());
    info!("  Seed: {}", settings.seed());

    let cohort = config.build_cohort(settings.seed())?;
    let grid = run_sensitivity(scenario, &cohort, &dims, &settings)?;

    println!("{}", report::sensitivity_block(&grid));
    println!();

    if let Some(path) = export_csv {
        let file = export::create_with_parents(path)?;
        export::write_sensitivity(file, &grid)?;
        println!("Exported sensitivity CSV to: {path}");
    }

    info!("Sensitivity sweep complete");
    Ok(())
}
