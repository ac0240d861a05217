//! Check command implementation
//!
//! Loads and validates the configuration file, then prints a short summary
//! of what it defines. Exits non-zero on any validation failure.

use tracing::info;

use crate::config::AppConfig;
use crate::{report, Result};

/// Run the check command
pub fn run(config_path: &str) -> Result<()> {
    info!("Checking configuration...");
    info!("  Path: {}", config_path);

    let config = AppConfig::load(config_path)?;

    println!("Configuration OK: {config_path}");
    println!(
        "  Scenarios: {}",
        config
            .scenarios
            .keys()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "  Defaults: {} runs, seed {}",
        config.defaults.runs, config.defaults.seed
    );
    println!(
        "  Thresholds: {}",
        config
            .defaults
            .thresholds
            .iter()
            .map(|&t| report::format_currency(t))
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(())
}
