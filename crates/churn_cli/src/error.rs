//! CLI error types.

use thiserror::Error;

/// Convenience alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced to the user by the `churnsim` binary.
#[derive(Error, Debug)]
pub enum CliError {
    /// A path given on the command line does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// A command-line argument or configuration entry is unusable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The configuration file is not valid JSON for the expected schema.
    #[error("Failed to parse {path}: {source}")]
    ParseConfig {
        /// Path of the offending file.
        path: String,
        /// Underlying deserialisation error.
        #[source]
        source: serde_json::Error,
    },

    /// JSON output could not be serialised.
    #[error("Failed to serialise output: {0}")]
    Serialise(#[from] serde_json::Error),

    /// Simulation-layer failure, passed through verbatim.
    #[error(transparent)]
    Model(#[from] churn_core::ModelError),

    /// Filesystem failure while reading configuration or writing exports.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// CSV serialisation failure during export.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
