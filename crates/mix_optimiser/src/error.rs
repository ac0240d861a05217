//! Error types for the mix optimiser.

use thiserror::Error;

/// Crate-wide result alias over [`OptimiserError`].
pub type Result<T> = std::result::Result<T, OptimiserError>;

/// Categorised optimiser errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptimiserError {
    /// Malformed or out-of-range configuration values.
    ///
    /// The message lists every violation found during validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A scenario name not present in the configuration.
    #[error("Unknown scenario '{name}'. Available: {available}")]
    UnknownScenario {
        /// The requested scenario name.
        name: String,
        /// Comma-separated list of configured scenario names, sorted.
        available: String,
    },

    /// The constraint set admits no candidate mix at the configured step.
    #[error("No feasible solution found for scenario '{0}'")]
    Infeasible(String),
}
