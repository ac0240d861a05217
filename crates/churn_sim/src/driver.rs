//! Monte Carlo driver.
//!
//! Repeats the single-trial engine over one seeded stream and collects the
//! per-run outcome vectors plus cumulative churn counters. All validation
//! happens before the first draw, so a failed run never returns partial
//! results.

use churn_core::cohort::CustomerCohort;
use churn_core::rng::SimRng;
use churn_core::scenario::ScenarioConfig;
use churn_core::{ModelError, Result};

use crate::trial::run_trial;

/// Maximum number of Monte Carlo runs accepted by
/// [`SimulationSettings::validate`].
///
/// The result keeps three `f64` vectors per run, so a count above this is
/// far more likely a mistyped argument than a real study; raise the bound
/// if one ever is.
pub const MAX_RUNS: usize = 10_000_000;

/// Run-count and seed settings for one simulation.
///
/// # Examples
///
/// ```rust
/// use churn_sim::SimulationSettings;
///
/// let settings = SimulationSettings::default().with_runs(10_000).with_seed(7);
/// assert_eq!(settings.runs(), 10_000);
/// assert_eq!(settings.seed(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationSettings {
    runs: usize,
    seed: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            runs: 5000,
            seed: 42,
        }
    }
}

impl SimulationSettings {
    /// Creates settings with an explicit run count and seed.
    #[inline]
    pub fn new(runs: usize, seed: u64) -> Self {
        Self { runs, seed }
    }

    /// Sets the run count.
    #[inline]
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Sets the seed.
    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the run count.
    #[inline]
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Returns the seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] if `runs` is 0 or greater than
    /// [`MAX_RUNS`].
    pub fn validate(&self) -> Result<()> {
        if self.runs == 0 || self.runs > MAX_RUNS {
            return Err(ModelError::InvalidConfig(format!(
                "runs must be in [1, {MAX_RUNS}], got {}",
                self.runs
            )));
        }
        Ok(())
    }
}

/// Full per-run output of a simulation, plus cumulative churn counters.
///
/// The three vectors are index-aligned by run. Churn counters accumulate
/// over every run, so segment churn rates divide by `runs * segment_size`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Simulated EBITDA per run.
    pub ebitda: Vec<f64>,
    /// Simulated contract revenue per run.
    pub contract_revenue: Vec<f64>,
    /// Retained fraction of base contract revenue per run.
    pub retained_fraction: Vec<f64>,
    /// Total top-segment churn events over all runs.
    pub top2_churned: u64,
    /// Total rest-segment churn events over all runs.
    pub rest_churned: u64,
    /// Number of runs executed.
    pub runs: usize,
    /// Seed the run stream was initialised with.
    pub seed: u64,
}

/// Runs the Monte Carlo simulation.
///
/// One [`SimRng`] stream seeded from `settings.seed()` drives every trial
/// sequentially, so identical `(config, cohort, settings)` inputs reproduce
/// the result bit for bit.
///
/// # Arguments
///
/// * `config` - Scenario parameters, validated before the first draw
/// * `cohort` - Customer revenue shares
/// * `settings` - Run count and seed
///
/// # Errors
///
/// Returns [`ModelError::InvalidConfig`] if the settings or the scenario
/// fail validation.
///
/// # Examples
///
/// ```rust
/// use churn_core::prelude::*;
/// use churn_sim::{run_simulation, SimulationSettings};
///
/// let scenario = ScenarioConfig::example_base();
/// let mut rng = SimRng::from_seed(42);
/// let cohort = CustomerCohort::build(&AllocationConfig::default(), &mut rng).unwrap();
///
/// let result = run_simulation(&scenario, &cohort, &SimulationSettings::new(100, 42)).unwrap();
/// assert_eq!(result.ebitda.len(), 100);
/// ```
pub fn run_simulation(
    config: &ScenarioConfig,
    cohort: &CustomerCohort,
    settings: &SimulationSettings,
) -> Result<SimulationResult> {
    settings.validate()?;
    config.validate()?;

    let runs = settings.runs();
    let mut rng = SimRng::from_seed(settings.seed());

    let mut ebitda = Vec::with_capacity(runs);
    let mut contract_revenue = Vec::with_capacity(runs);
    let mut retained_fraction = Vec::with_capacity(runs);
    let mut top2_churned = 0u64;
    let mut rest_churned = 0u64;

    for _ in 0..runs {
        let trial = run_trial(config, cohort, &mut rng)?;
        ebitda.push(trial.ebitda);
        contract_revenue.push(trial.contract_revenue);
        retained_fraction.push(trial.retained_fraction);
        top2_churned += u64::from(trial.top2_churned);
        rest_churned += u64::from(trial.rest_churned);
    }

    Ok(SimulationResult {
        ebitda,
        contract_revenue,
        retained_fraction,
        top2_churned,
        rest_churned,
        runs,
        seed: settings.seed(),
    })
}
