//! End-to-end simulation tests.
//!
//! These tests exercise the full pipeline from scenario parameters to risk
//! metrics at production run counts, pinning down:
//!
//! 1. **Reproducibility**: identical inputs give bit-identical outputs
//! 2. **Calibration**: the worked base case lands in its expected band
//! 3. **Degenerate cases**: certain renewal with no downsell is lossless
//! 4. **Sweep shape**: the default grid covers all 81 combinations

use approx::assert_relative_eq;
use churn_core::cohort::{AllocationConfig, AllocationMode, CustomerCohort};
use churn_core::rng::SimRng;
use churn_core::scenario::ScenarioConfig;
use churn_sim::{
    percentile, run_sensitivity, run_simulation, summarise, SimulationSettings, SweepDims,
};

/// The worked base case: 3.2M contract base, 1.0M EBITDA, 70/80 renewal
/// means, mild downsell skew, 25% backfill.
fn base_scenario() -> ScenarioConfig {
    ScenarioConfig::example_base()
}

fn equal_cohort() -> CustomerCohort {
    let mut rng = SimRng::from_seed(0);
    CustomerCohort::build(&AllocationConfig::default(), &mut rng).unwrap()
}

// ============================================================================
// Reproducibility
// ============================================================================

#[test]
fn test_full_run_is_bit_identical_across_repeats() {
    let scenario = base_scenario();
    let cohort = equal_cohort();
    let settings = SimulationSettings::new(5000, 42);

    let first = run_simulation(&scenario, &cohort, &settings).unwrap();
    let second = run_simulation(&scenario, &cohort, &settings).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        summarise(&first, &[1_000_000.0, 800_000.0]).unwrap(),
        summarise(&second, &[1_000_000.0, 800_000.0]).unwrap()
    );
}

#[test]
fn test_dirichlet_cohort_runs_are_reproducible() {
    let scenario = base_scenario();
    let alloc = AllocationConfig {
        mode: AllocationMode::Dirichlet,
        ..AllocationConfig::default()
    };
    let settings = SimulationSettings::new(1000, 42);

    let cohort_a = CustomerCohort::build(&alloc, &mut SimRng::from_seed(9)).unwrap();
    let cohort_b = CustomerCohort::build(&alloc, &mut SimRng::from_seed(9)).unwrap();

    let a = run_simulation(&scenario, &cohort_a, &settings).unwrap();
    let b = run_simulation(&scenario, &cohort_b, &settings).unwrap();
    assert_eq!(a, b);
}

// ============================================================================
// Calibration of the worked base case
// ============================================================================

#[test]
fn test_base_case_mean_ebitda_band() {
    let scenario = base_scenario();
    let cohort = equal_cohort();
    let settings = SimulationSettings::new(5000, 42);

    let result = run_simulation(&scenario, &cohort, &settings).unwrap();
    let metrics = summarise(&result, &[1_000_000.0, 800_000.0]).unwrap();

    // Expected churn drag puts the mean well below the 1.0M base but far
    // from the stress threshold.
    assert!(
        metrics.mean_ebitda > 850_000.0 && metrics.mean_ebitda < 950_000.0,
        "mean EBITDA {} outside expected band",
        metrics.mean_ebitda
    );
    assert!(metrics.p5_ebitda <= metrics.p10_ebitda);
    assert!(metrics.p10_ebitda <= metrics.median_ebitda);
    assert!(metrics.retained_pct > 0.0 && metrics.retained_pct < 1.0);
}

#[test]
fn test_base_case_threshold_probabilities_are_ordered() {
    let scenario = base_scenario();
    let cohort = equal_cohort();
    let settings = SimulationSettings::new(5000, 42);

    let result = run_simulation(&scenario, &cohort, &settings).unwrap();
    let metrics = summarise(&result, &[1_000_000.0, 800_000.0]).unwrap();

    let (high, p_high) = metrics.prob_below[0];
    let (low, p_low) = metrics.prob_below[1];
    assert_relative_eq!(high, 1_000_000.0);
    assert_relative_eq!(low, 800_000.0);
    assert!((0.0..=1.0).contains(&p_high));
    assert!((0.0..=1.0).contains(&p_low));
    // Falling below the lower threshold implies falling below the higher.
    assert!(p_low <= p_high);
}

#[test]
fn test_base_case_churn_rates_track_renewal_means() {
    let scenario = base_scenario();
    let cohort = equal_cohort();
    let settings = SimulationSettings::new(5000, 42);

    let result = run_simulation(&scenario, &cohort, &settings).unwrap();
    let metrics = summarise(&result, &[1_000_000.0]).unwrap();

    // Renewal means of 0.70 / 0.80 imply churn rates near 0.30 / 0.20.
    assert!((metrics.top2_churn_rate - 0.30).abs() < 0.03);
    assert!((metrics.rest_churn_rate - 0.20).abs() < 0.03);
}

// ============================================================================
// Degenerate cases
// ============================================================================

#[test]
fn test_no_churn_no_downsell_retains_base_every_trial() {
    let mut scenario = base_scenario();
    scenario.top2_renewal_mean = 1.0;
    scenario.rest_renewal_mean = 1.0;
    scenario.downsell_low = 1.0;
    scenario.downsell_mode = 1.0;
    scenario.downsell_high = 1.0;
    let cohort = equal_cohort();
    let settings = SimulationSettings::new(1000, 42);

    let result = run_simulation(&scenario, &cohort, &settings).unwrap();
    for (revenue, retained) in result
        .contract_revenue
        .iter()
        .zip(result.retained_fraction.iter())
    {
        assert_relative_eq!(*revenue, scenario.base_contract_revenue, epsilon = 1e-6);
        assert_relative_eq!(*retained, 1.0, epsilon = 1e-12);
    }
    for ebitda in &result.ebitda {
        assert_relative_eq!(*ebitda, scenario.base_ebitda, epsilon = 1e-6);
    }
    assert_eq!(result.top2_churned, 0);
    assert_eq!(result.rest_churned, 0);
}

#[test]
fn test_zero_renewal_full_backfill_also_retains_base() {
    let mut scenario = base_scenario();
    scenario.top2_renewal_mean = 0.0;
    scenario.rest_renewal_mean = 0.0;
    scenario.backfill_fraction = 1.0;
    let cohort = equal_cohort();
    let settings = SimulationSettings::new(500, 42);

    let result = run_simulation(&scenario, &cohort, &settings).unwrap();
    for revenue in &result.contract_revenue {
        assert_relative_eq!(*revenue, scenario.base_contract_revenue, epsilon = 1e-6);
    }
    assert_eq!(result.top2_churned, 1000);
    assert_eq!(result.rest_churned, 3000);
}

// ============================================================================
// Sweep shape
// ============================================================================

#[test]
fn test_default_sweep_runs_81_cells_at_shared_seed() {
    let scenario = base_scenario();
    let cohort = equal_cohort();
    let settings = SimulationSettings::new(500, 42);

    let grid = run_sensitivity(&scenario, &cohort, &SweepDims::default(), &settings).unwrap();
    assert_eq!(grid.len(), 81);

    // The cell matching the base parameters reproduces the base run's P10.
    let direct = run_simulation(&scenario, &cohort, &settings).unwrap();
    let direct_p10 = percentile(&direct.ebitda, 10.0).unwrap();
    let base_cell = grid
        .cells()
        .iter()
        .find(|c| c.key() == (0.25, 0.7, 0.70, 0.25))
        .expect("base parameter cell present");
    assert_relative_eq!(base_cell.p10_ebitda, direct_p10);
}

#[test]
fn test_sweep_p10_improves_with_friendlier_assumptions() {
    let scenario = base_scenario();
    let cohort = equal_cohort();
    let settings = SimulationSettings::new(1000, 42);

    let grid = run_sensitivity(&scenario, &cohort, &SweepDims::default(), &settings).unwrap();
    let sorted = grid.sorted_by_p10();

    let worst = sorted.first().unwrap();
    let best = sorted.last().unwrap();
    assert!(worst.p10_ebitda < best.p10_ebitda);
    // The strongest renewal/backfill corner cannot be the worst cell.
    assert_ne!(worst.key().2, 0.90);
}
