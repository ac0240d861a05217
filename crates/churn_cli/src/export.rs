//! CSV export of run-level results and sweep cells.
//!
//! Writers are generic over `io::Write` so the record layout can be tested
//! against an in-memory buffer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use churn_sim::{SensitivityGrid, SimulationResult};

use crate::Result;

/// Opens `path` for writing, creating missing parent directories first.
///
/// # Errors
///
/// Returns an I/O error if a directory or the file cannot be created.
pub fn create_with_parents(path: &str) -> Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(File::create(path)?)
}

/// Writes one row per simulated run.
///
/// Revenue columns carry six decimal places; the retained column is the
/// fraction of base contract revenue, not a percentage.
///
/// # Errors
///
/// Returns a CSV or I/O error if writing fails.
pub fn write_runs<W: Write>(writer: W, result: &SimulationResult, scenario: &str) -> Result<()> {
    let mut csv_writer = Writer::from_writer(writer);
    csv_writer.write_record([
        "run_index",
        "scenario",
        "seed",
        "simulated_ebitda",
        "simulated_contract_revenue",
        "retained_pct_of_base_contract",
    ])?;

    let seed = result.seed.to_string();
    for (index, ((ebitda, contract), retained)) in result
        .ebitda
        .iter()
        .zip(&result.contract_revenue)
        .zip(&result.retained_fraction)
        .enumerate()
    {
        csv_writer.write_record([
            (index + 1).to_string(),
            scenario.to_string(),
            seed.clone(),
            format!("{ebitda:.6}"),
            format!("{contract:.6}"),
            format!("{retained:.6}"),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes one row per sweep cell, in grid order.
///
/// # Errors
///
/// Returns a CSV or I/O error if writing fails.
pub fn write_sensitivity<W: Write>(writer: W, grid: &SensitivityGrid) -> Result<()> {
    let mut csv_writer = Writer::from_writer(writer);
    csv_writer.write_record([
        "gm_contract",
        "drop_through",
        "top2_renewal_mean",
        "backfill_fraction",
        "p10_ebitda",
    ])?;

    for cell in grid.cells() {
        csv_writer.write_record([
            cell.gm_contract.to_string(),
            cell.drop_through.to_string(),
            cell.top2_renewal_mean.to_string(),
            cell.backfill_fraction.to_string(),
            format!("{:.6}", cell.p10_ebitda),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
