//! CLI error types.

use thiserror::Error;

/// Convenience alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced to the user by the `mixopt` binary.
#[derive(Error, Debug)]
pub enum CliError {
    /// A path given on the command line does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// A command-line argument is unusable.
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

    /// Optimiser-layer failure, passed through verbatim.
    #[error(transparent)]
    Optimiser(#[from] mix_optimiser::OptimiserError),

    /// Filesystem failure while reading configuration.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
