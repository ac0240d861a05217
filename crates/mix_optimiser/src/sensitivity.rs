//! One-way sensitivity over the levers management actually controls.
//!
//! Each configured candidate value is applied on its own, with every other
//! assumption held at the scenario's resolved value, and the mix is
//! re-optimised. Rows come back grouped by parameter in a fixed order so the
//! report reads the same regardless of configuration edits.

use crate::config::{MixConfig, ScenarioOverride};
use crate::error::Result;
use crate::optimise::{optimise, MixOutcome};

/// One re-optimised cell of the one-way sensitivity pass.
#[derive(Debug, Clone, PartialEq)]
pub struct OneWayRow {
    /// Name of the varied parameter.
    pub parameter: &'static str,
    /// Value the parameter was set to.
    pub value: f64,
    /// Optimal mix under that value.
    pub outcome: MixOutcome,
}

/// Runs the one-way sensitivity pass for one scenario.
///
/// Parameters are processed in a fixed order: changeover hours per run,
/// canning hours capacity, contract gross margin, branded gross margin.
/// Within each parameter the configured candidate order is kept.
///
/// # Errors
///
/// Returns an error if the scenario is unknown, if any candidate value fails
/// validation, or if any re-optimised cell is infeasible.
pub fn run_one_way(config: &MixConfig, scenario: &str) -> Result<Vec<OneWayRow>> {
    let resolved = config.resolve(scenario)?;
    let lists = &config.sensitivity;

    let mut rows = Vec::with_capacity(
        lists.changeover_hours_per_run.len()
            + lists.canning_hours_capacity.len()
            + lists.contract_gm.len()
            + lists.branded_gm.len(),
    );

    for &value in &lists.changeover_hours_per_run {
        let variant = resolved.with_override(&ScenarioOverride {
            changeover_hours_per_run: Some(value),
            ..ScenarioOverride::default()
        })?;
        rows.push(OneWayRow {
            parameter: "changeover_hours_per_run",
            value,
            outcome: optimise(&variant)?,
        });
    }
    for &value in &lists.canning_hours_capacity {
        let variant = resolved.with_override(&ScenarioOverride {
            canning_hours_capacity: Some(value),
            ..ScenarioOverride::default()
        })?;
        rows.push(OneWayRow {
            parameter: "canning_hours_capacity",
            value,
            outcome: optimise(&variant)?,
        });
    }
    for &value in &lists.contract_gm {
        let variant = resolved.with_override(&ScenarioOverride {
            contract_gm: Some(value),
            ..ScenarioOverride::default()
        })?;
        rows.push(OneWayRow {
            parameter: "contract_gm",
            value,
            outcome: optimise(&variant)?,
        });
    }
    for &value in &lists.branded_gm {
        let variant = resolved.with_override(&ScenarioOverride {
            branded_gm: Some(value),
            ..ScenarioOverride::default()
        })?;
        rows.push(OneWayRow {
            parameter: "branded_gm",
            value,
            outcome: optimise(&variant)?,
        });
    }

    Ok(rows)
}
