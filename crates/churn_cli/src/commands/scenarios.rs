//! Scenarios command implementation
//!
//! Lists the scenarios defined in the configuration file with their key
//! assumptions, plus the accepted aliases.

use crate::config::AppConfig;
use crate::Result;

/// Run the scenarios command
pub fn run(config_path: &str) -> Result<()> {
    let config = AppConfig::load(config_path)?;

    println!("Configured scenarios:");
    for (name, scenario) in &config.scenarios {
        println!(
            "  {name}: renewal {:.2} / {:.2}, downsell mode {:.2}, backfill {:.0}%, GM {:.0}%",
            scenario.top2_renewal_mean,
            scenario.rest_renewal_mean,
            scenario.downsell_mode,
            scenario.backfill_fraction * 100.0,
            scenario.gm_contract * 100.0,
        );
    }
    println!();
    println!("Aliases: optimistic -> upside");

    Ok(())
}
