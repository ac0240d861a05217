//! Four-dimensional assumption sweep.
//!
//! Crosses candidate values for contract gross margin, drop-through, top-2
//! renewal mean, and backfill fraction, re-running the full simulation for
//! every combination. Each cell reuses the base seed, so the P10 spread
//! across the grid reflects assumption changes alone, not resampling noise.
//!
//! Cells are independent and evaluate on the rayon thread pool; each one
//! carries its own parameter tuple, so results identify themselves no matter
//! how the work was scheduled.

use churn_core::cohort::CustomerCohort;
use churn_core::scenario::ScenarioConfig;
use churn_core::{ModelError, Result};
use rayon::prelude::*;

use crate::driver::{run_simulation, SimulationSettings};
use crate::metrics::percentile;

/// Candidate values for each swept dimension.
///
/// The default grid is 3 values per dimension, 81 cells in total.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepDims {
    /// Contract gross margin candidates.
    pub gm_contract: Vec<f64>,
    /// Drop-through candidates.
    pub drop_through: Vec<f64>,
    /// Top-2 renewal mean candidates.
    pub top2_renewal_mean: Vec<f64>,
    /// Backfill fraction candidates.
    pub backfill_fraction: Vec<f64>,
}

impl Default for SweepDims {
    fn default() -> Self {
        Self {
            gm_contract: vec![0.22, 0.25, 0.28],
            drop_through: vec![0.5, 0.7, 0.9],
            top2_renewal_mean: vec![0.70, 0.80, 0.90],
            backfill_fraction: vec![0.0, 0.25, 0.50],
        }
    }
}

impl SweepDims {
    /// Number of cells in the Cartesian product.
    pub fn cell_count(&self) -> usize {
        self.gm_contract.len()
            * self.drop_through.len()
            * self.top2_renewal_mean.len()
            * self.backfill_fraction.len()
    }

    /// Validates that every dimension has at least one finite candidate.
    ///
    /// Range checks happen per cell: each combination is written into a copy
    /// of the scenario and re-validated before its simulation runs.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] listing each empty or
    /// non-finite dimension.
    pub fn validate(&self) -> Result<()> {
        let mut violations = Vec::new();

        for (name, axis) in [
            ("gm_contract", &self.gm_contract),
            ("drop_through", &self.drop_through),
            ("top2_renewal_mean", &self.top2_renewal_mean),
            ("backfill_fraction", &self.backfill_fraction),
        ] {
            if axis.is_empty() {
                violations.push(format!("sweep dimension {name} must not be empty"));
            }
            if axis.iter().any(|v| !v.is_finite()) {
                violations.push(format!("sweep dimension {name} must be finite"));
            }
        }

        ModelError::from_violations(violations)
    }
}

/// One evaluated sweep cell: the four overrides plus the resulting P10.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepCell {
    /// Contract gross margin override.
    pub gm_contract: f64,
    /// Drop-through override.
    pub drop_through: f64,
    /// Top-2 renewal mean override.
    pub top2_renewal_mean: f64,
    /// Backfill fraction override.
    pub backfill_fraction: f64,
    /// 10th percentile of simulated EBITDA under these overrides.
    pub p10_ebitda: f64,
}

impl SweepCell {
    /// The cell's parameter tuple, in sweep-dimension order.
    pub fn key(&self) -> (f64, f64, f64, f64) {
        (
            self.gm_contract,
            self.drop_through,
            self.top2_renewal_mean,
            self.backfill_fraction,
        )
    }
}

/// All evaluated cells of one sweep, in Cartesian-product order.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityGrid {
    cells: Vec<SweepCell>,
}

impl SensitivityGrid {
    /// Cells in Cartesian-product order: `gm_contract` outermost,
    /// `backfill_fraction` innermost.
    pub fn cells(&self) -> &[SweepCell] {
        &self.cells
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid holds no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells sorted ascending by P10 EBITDA, worst combinations first.
    pub fn sorted_by_p10(&self) -> Vec<SweepCell> {
        let mut sorted = self.cells.clone();
        sorted.sort_by(|a, b| a.p10_ebitda.total_cmp(&b.p10_ebitda));
        sorted
    }
}

/// Runs the assumption sweep over the Cartesian product of `dims`.
///
/// Every cell copies the base scenario, overrides exactly its four
/// parameters, re-validates, and runs a fresh simulation with the same
/// `settings` (and therefore the same seed) as every other cell.
///
/// # Arguments
///
/// * `config` - Base scenario the overrides apply to
/// * `cohort` - Customer revenue shares, shared by all cells
/// * `dims` - Candidate values per dimension
/// * `settings` - Run count and seed, identical for every cell
///
/// # Errors
///
/// Returns [`ModelError::InvalidConfig`] if the settings, base scenario, or
/// dimensions fail validation, or if any cell's overridden scenario does.
pub fn run_sensitivity(
    config: &ScenarioConfig,
    cohort: &CustomerCohort,
    dims: &SweepDims,
    settings: &SimulationSettings,
) -> Result<SensitivityGrid> {
    settings.validate()?;
    config.validate()?;
    dims.validate()?;

    let mut combos = Vec::with_capacity(dims.cell_count());
    for &gm in &dims.gm_contract {
        for &drop_through in &dims.drop_through {
            for &top2 in &dims.top2_renewal_mean {
                for &backfill in &dims.backfill_fraction {
                    combos.push((gm, drop_through, top2, backfill));
                }
            }
        }
    }

    let cells = combos
        .par_iter()
        .map(|&(gm_contract, drop_through, top2_renewal_mean, backfill_fraction)| {
            let mut cell_config = config.clone();
            cell_config.gm_contract = gm_contract;
            cell_config.drop_through = drop_through;
            cell_config.top2_renewal_mean = top2_renewal_mean;
            cell_config.backfill_fraction = backfill_fraction;
            cell_config.validate()?;

            let result = run_simulation(&cell_config, cohort, settings)?;
            let p10_ebitda = percentile(&result.ebitda, 10.0)?;

            Ok(SweepCell {
                gm_contract,
                drop_through,
                top2_renewal_mean,
                backfill_fraction,
                p10_ebitda,
            })
        })
        .collect::<Result<Vec<SweepCell>>>()?;

    Ok(SensitivityGrid { cells })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use churn_core::cohort::AllocationConfig;
    use churn_core::rng::SimRng;
    use std::collections::HashSet;

    fn build_cohort() -> CustomerCohort {
        let mut rng = SimRng::from_seed(0);
        CustomerCohort::build(&AllocationConfig::default(), &mut rng).unwrap()
    }

    fn small_settings() -> SimulationSettings {
        SimulationSettings::new(200, 42)
    }

    #[test]
    fn test_default_dims_have_81_cells() {
        assert_eq!(SweepDims::default().cell_count(), 81);
    }

    #[test]
    fn test_grid_covers_every_combination_once() {
        let config = ScenarioConfig::example_base();
        let cohort = build_cohort();
        let grid =
            run_sensitivity(&config, &cohort, &SweepDims::default(), &small_settings()).unwrap();

        assert_eq!(grid.len(), 81);
        let keys: HashSet<(u64, u64, u64, u64)> = grid
            .cells()
            .iter()
            .map(|c| {
                let (gm, dt, top2, bf) = c.key();
                (gm.to_bits(), dt.to_bits(), top2.to_bits(), bf.to_bits())
            })
            .collect();
        assert_eq!(keys.len(), 81);
    }

    #[test]
    fn test_cells_follow_cartesian_order() {
        let config = ScenarioConfig::example_base();
        let cohort = build_cohort();
        let grid =
            run_sensitivity(&config, &cohort, &SweepDims::default(), &small_settings()).unwrap();

        assert_eq!(grid.cells()[0].key(), (0.22, 0.5, 0.70, 0.0));
        assert_eq!(grid.cells()[80].key(), (0.28, 0.9, 0.90, 0.50));
    }

    #[test]
    fn test_base_valued_cell_matches_direct_run() {
        let config = ScenarioConfig::example_base();
        let cohort = build_cohort();
        let settings = small_settings();

        let dims = SweepDims {
            gm_contract: vec![config.gm_contract],
            drop_through: vec![config.drop_through],
            top2_renewal_mean: vec![config.top2_renewal_mean],
            backfill_fraction: vec![config.backfill_fraction],
        };
        let grid = run_sensitivity(&config, &cohort, &dims, &settings).unwrap();
        assert_eq!(grid.len(), 1);

        let direct = run_simulation(&config, &cohort, &settings).unwrap();
        let direct_p10 = percentile(&direct.ebitda, 10.0).unwrap();
        assert_relative_eq!(grid.cells()[0].p10_ebitda, direct_p10);
    }

    #[test]
    fn test_sorted_by_p10_is_ascending() {
        let config = ScenarioConfig::example_base();
        let cohort = build_cohort();
        let grid =
            run_sensitivity(&config, &cohort, &SweepDims::default(), &small_settings()).unwrap();

        let sorted = grid.sorted_by_p10();
        for pair in sorted.windows(2) {
            assert!(pair[0].p10_ebitda <= pair[1].p10_ebitda);
        }
    }

    #[test]
    fn test_sweep_is_deterministic() {
        let config = ScenarioConfig::example_base();
        let cohort = build_cohort();

        let a = run_sensitivity(&config, &cohort, &SweepDims::default(), &small_settings())
            .unwrap();
        let b = run_sensitivity(&config, &cohort, &SweepDims::default(), &small_settings())
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_dimension_is_rejected() {
        let dims = SweepDims {
            gm_contract: Vec::new(),
            ..SweepDims::default()
        };
        assert!(dims.validate().is_err());
    }

    #[test]
    fn test_out_of_range_candidate_fails_cell_validation() {
        let config = ScenarioConfig::example_base();
        let cohort = build_cohort();
        let dims = SweepDims {
            gm_contract: vec![1.5],
            drop_through: vec![0.7],
            top2_renewal_mean: vec![0.8],
            backfill_fraction: vec![0.25],
        };

        let result = run_sensitivity(&config, &cohort, &dims, &small_settings());
        assert!(result.is_err());
    }
}
