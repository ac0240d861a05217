//! Application configuration for the `churnsim` binary.
//!
//! One JSON file carries the simulation defaults, the case anchors echoed in
//! report headers, the customer allocation, and the named scenarios. The
//! whole file is validated at load time so every command fails fast on a bad
//! configuration rather than partway through a run.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use churn_core::prelude::{AllocationConfig, CustomerCohort, ScenarioConfig, SimRng};
use churn_sim::SimulationSettings;

use crate::{CliError, Result};

fn default_runs() -> usize {
    5_000
}

fn default_seed() -> u64 {
    42
}

fn default_thresholds() -> Vec<f64> {
    vec![1_000_000.0, 800_000.0]
}

/// Simulation defaults applied when the matching flags are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimDefaults {
    /// Number of Monte Carlo runs.
    #[serde(default = "default_runs")]
    pub runs: usize,
    /// Random seed.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// EBITDA thresholds for shortfall probabilities, current level first.
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<f64>,
}

impl Default for SimDefaults {
    fn default() -> Self {
        Self {
            runs: default_runs(),
            seed: default_seed(),
            thresholds: default_thresholds(),
        }
    }
}

/// Case facts echoed in report headers. These are descriptive only and never
/// feed the simulation itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseAnchors {
    /// Last-twelve-months total revenue, contract and otherwise.
    pub ltm_total_revenue: f64,
    /// Approximate number of contract clients.
    pub contract_client_count: u32,
    /// Share of contract revenue booked by the two largest clients.
    pub top2_contract_share: f64,
    /// Typical contract term in months.
    pub contract_term_months: u32,
}

/// Root of the `churnsim` configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Simulation defaults.
    #[serde(default)]
    pub defaults: SimDefaults,
    /// Case facts for report headers.
    pub anchors: CaseAnchors,
    /// Customer allocation shared by every scenario.
    #[serde(default)]
    pub allocation: AllocationConfig,
    /// Named scenarios, sorted by name for stable listings.
    pub scenarios: BTreeMap<String, ScenarioConfig>,
}

impl AppConfig {
    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::FileNotFound`] if `path` does not exist,
    /// [`CliError::ParseConfig`] if it is not valid JSON for this schema,
    /// and a validation error if any scenario or default is out of range.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Err(CliError::FileNotFound(path.to_string()));
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| CliError::ParseConfig {
            path: path.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates defaults, allocation, and every scenario.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, with the scenario name prefixed
    /// where one applies.
    pub fn validate(&self) -> Result<()> {
        if self.scenarios.is_empty() {
            return Err(CliError::InvalidArgument(
                "configuration defines no scenarios".to_string(),
            ));
        }

        self.allocation.validate()?;

        for (name, scenario) in &self.scenarios {
            scenario
                .validate()
                .map_err(|err| CliError::InvalidArgument(format!("scenario '{name}': {err}")))?;
        }

        SimulationSettings::new(self.defaults.runs, self.defaults.seed)
            .validate()
            .map_err(|err| CliError::InvalidArgument(format!("defaults: {err}")))?;

        if self.defaults.thresholds.is_empty() {
            return Err(CliError::InvalidArgument(
                "defaults: thresholds must not be empty".to_string(),
            ));
        }
        for &threshold in &self.defaults.thresholds {
            if !threshold.is_finite() || threshold <= 0.0 {
                return Err(CliError::InvalidArgument(format!(
                    "defaults: thresholds must be positive, got {threshold}"
                )));
            }
        }

        Ok(())
    }

    /// Looks up a scenario after alias normalisation.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidArgument`] naming the available scenarios
    /// when the lookup fails.
    pub fn resolve_scenario<'a>(&'a self, name: &'a str) -> Result<(&'a str, &'a ScenarioConfig)> {
        let resolved = normalise_scenario_name(name);
        match self.scenarios.get(resolved) {
            Some(scenario) => Ok((resolved, scenario)),
            None => Err(CliError::InvalidArgument(format!(
                "Unknown scenario '{resolved}'. Available: {}",
                self.scenarios
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    /// Builds simulation settings, preferring flag values over defaults.
    pub fn settings_with(&self, runs: Option<usize>, seed: Option<u64>) -> SimulationSettings {
        SimulationSettings::new(
            runs.unwrap_or(self.defaults.runs),
            seed.unwrap_or(self.defaults.seed),
        )
    }

    /// Picks the thresholds to report on, preferring flag values.
    pub fn thresholds_with(&self, flag: Option<&[f64]>) -> Vec<f64> {
        match flag {
            Some(values) => values.to_vec(),
            None => self.defaults.thresholds.clone(),
        }
    }

    /// Builds the customer cohort from the configured allocation. The seed
    /// only matters for Dirichlet allocation, where it fixes the share draw.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the allocation parameters are out of
    /// range.
    pub fn build_cohort(&self, seed: u64) -> Result<CustomerCohort> {
        let mut rng = SimRng::from_seed(seed);
        Ok(CustomerCohort::build(&self.allocation, &mut rng)?)
    }
}

/// Maps legacy scenario aliases onto their configured names.
pub fn normalise_scenario_name(name: &str) -> &str {
    match name {
        "optimistic" => "upside",
        other => other,
    }
}
