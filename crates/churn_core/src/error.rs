//! Error types for the churn model.
//!
//! This module provides:
//! - `ModelError`: Errors from configuration validation and aggregation
//! - `Result`: Crate-wide result alias

use thiserror::Error;

/// Crate-wide result alias over [`ModelError`].
pub type Result<T> = std::result::Result<T, ModelError>;

/// Categorised model errors.
///
/// Errors indicate programmer or configuration mistakes, never transient
/// conditions, so callers should propagate them unmodified rather than retry.
///
/// # Variants
/// - `InvalidConfig`: Malformed or out-of-range scenario/invocation parameters
/// - `EmptyResult`: Aggregation attempted over zero trials
///
/// # Examples
/// ```
/// use churn_core::ModelError;
///
/// let err = ModelError::InvalidConfig("runs must be > 0".to_string());
/// assert_eq!(format!("{}", err), "Invalid configuration: runs must be > 0");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Malformed or out-of-range scenario/invocation parameters.
    ///
    /// The message lists every violation found at the failing boundary.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Aggregation attempted over an empty simulation result.
    #[error("Empty result: no trials to aggregate")]
    EmptyResult,
}

impl ModelError {
    /// Builds an `InvalidConfig` error from a list of violation messages.
    ///
    /// Returns `Ok(())` when the list is empty, so validation code can
    /// collect every violation before failing.
    pub fn from_violations(violations: Vec<String>) -> Result<()> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ModelError::InvalidConfig(violations.join("; ")))
        }
    }
}
