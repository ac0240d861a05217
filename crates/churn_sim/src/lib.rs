//! # churn_sim: Monte Carlo Engine for Contract-Churn Analysis
//!
//! This crate turns a validated [`ScenarioConfig`](churn_core::scenario::ScenarioConfig)
//! and a [`CustomerCohort`](churn_core::cohort::CustomerCohort) into an EBITDA
//! distribution and the risk metrics read off it:
//!
//! - `trial`: one churn/renewal/downsell/backfill pass over the cohort
//! - `driver`: the seeded Monte Carlo loop producing a [`SimulationResult`]
//! - `metrics`: percentiles, threshold probabilities, and segment churn rates
//! - `sensitivity`: the four-dimensional assumption sweep, parallelised with
//!   rayon, every cell re-run on the same seed so differences between cells
//!   are parameter effects rather than sampling noise
//!
//! ## Determinism
//!
//! `(config, cohort, runs, seed)` fully determines a [`SimulationResult`],
//! bit for bit. Sweep cells and what-if re-runs rely on this to be
//! comparable against the base run.
//!
//! ## Usage Examples
//!
//! ```rust
//! use churn_core::prelude::*;
//! use churn_sim::{run_simulation, summarise, SimulationSettings};
//!
//! let scenario = ScenarioConfig::example_base();
//! let mut rng = SimRng::from_seed(42);
//! let cohort = CustomerCohort::build(&AllocationConfig::default(), &mut rng).unwrap();
//!
//! let settings = SimulationSettings::new(1000, 42);
//! let result = run_simulation(&scenario, &cohort, &settings).unwrap();
//! let metrics = summarise(&result, &[1_000_000.0, 800_000.0]).unwrap();
//!
//! assert!(metrics.p5_ebitda <= metrics.p10_ebitda);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod driver;
pub mod metrics;
pub mod sensitivity;
pub mod trial;

pub use driver::{run_simulation, SimulationResult, SimulationSettings, MAX_RUNS};
pub use metrics::{percentile, summarise, RiskMetrics};
pub use sensitivity::{run_sensitivity, SensitivityGrid, SweepCell, SweepDims};
pub use trial::{run_trial, TrialResult};
