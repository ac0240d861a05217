//! # mix_optimiser: Branded vs Contract Production Mix
//!
//! Chooses production volumes for two product streams, branded and contract,
//! under a facility volume cap and a canning-line hours cap. Branded volume
//! also pays a changeover toll proportional to its run count, which is what
//! makes the trade-off interesting: branded carries the higher margin but
//! burns canning hours faster.
//!
//! The search is a bounded grid walk in `bbl_step` increments over both
//! streams, exact for the step resolution and trivially explainable in a
//! review, which is the point of the tool:
//!
//! - `config`: typed assumption records and per-scenario overrides
//! - `optimise`: the grid search and the derived economics of the winner
//! - `sensitivity`: one-way re-optimisation over candidate parameter lists
//! - `error`: [`OptimiserError`]
//!
//! ## Usage Examples
//!
//! ```rust
//! use mix_optimiser::{optimise, MixConfig};
//!
//! let config = MixConfig::example();
//! let resolved = config.resolve("base").unwrap();
//! let outcome = optimise(&resolved).unwrap();
//!
//! assert!(outcome.total_bbl <= outcome.capacity_bbl);
//! assert!(outcome.canning_hours_used <= outcome.canning_hours_capacity + 1e-9);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod config;
pub mod error;
pub mod optimise;
pub mod sensitivity;

pub use config::{
    Assumptions, BaselineMix, CanningAssumptions, CaseAnchors, DemandLimits, MixConfig,
    OptimisationSettings, ResolvedScenario, ScenarioOverride, SensitivityLists, StreamPair,
};
pub use error::{OptimiserError, Result};
pub use optimise::{canning_hours, optimise, MixOutcome};
pub use sensitivity::{run_one_way, OneWayRow};
