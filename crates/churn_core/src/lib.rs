//! # churn_core: Foundation for the Contract-Churn Toolset
//!
//! ## Foundation Layer Role
//!
//! churn_core is the bottom layer of the workspace, providing:
//! - Scenario parameter records with eager validation (`scenario`)
//! - Customer revenue allocation: top-2 concentration plus rest split (`cohort`)
//! - Random variate samplers: Bernoulli, Triangular, Beta, Dirichlet (`sampling`)
//! - A seeded, reproducible random source (`rng`)
//! - Error types: `ModelError` (`error`)
//!
//! ## No Ambient Randomness Principle
//!
//! Nothing in this crate reads from a global or thread-local random source.
//! Every draw goes through an explicitly constructed, explicitly seeded
//! [`SimRng`](rng::SimRng) passed by the caller, so a run is fully determined
//! by `(parameters, seed)` and sweep cells can execute on worker threads
//! without shared state.
//!
//! ## Usage Examples
//!
//! ```rust
//! use churn_core::prelude::*;
//!
//! let scenario = ScenarioConfig::example_base();
//! scenario.validate().unwrap();
//!
//! let mut rng = SimRng::from_seed(42);
//! let cohort = CustomerCohort::build(&AllocationConfig::default(), &mut rng).unwrap();
//! assert_eq!(cohort.len(), 8);
//!
//! let renewed = sample_bernoulli(scenario.top2_renewal_mean, &mut rng).unwrap();
//! let _ = renewed;
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod cohort;
pub mod error;
pub mod rng;
pub mod sampling;
pub mod scenario;

pub use error::{ModelError, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cohort::{AllocationConfig, AllocationMode, CustomerCohort};
    pub use crate::error::{ModelError, Result};
    pub use crate::rng::SimRng;
    pub use crate::sampling::{
        sample_bernoulli, sample_beta, sample_dirichlet, sample_triangular,
    };
    pub use crate::scenario::ScenarioConfig;
}
