//! Configuration loading for the `mixopt` binary.
//!
//! The schema itself lives in `mix_optimiser`; this module only adds file
//! handling and wraps parse failures with the offending path.

use std::path::Path;

use mix_optimiser::MixConfig;

use crate::{CliError, Result};

/// Loads and validates a configuration file.
///
/// # Errors
///
/// Returns [`CliError::FileNotFound`] if `path` does not exist,
/// [`CliError::ParseConfig`] if it is not valid JSON for the
/// [`MixConfig`] schema, and a validation error if the base assumptions
/// are out of range.
pub fn load(path: &str) -> Result<MixConfig> {
    if !Path::new(path).exists() {
        return Err(CliError::FileNotFound(path.to_string()));
    }
    let raw = std::fs::read_to_string(path)?;
    let config: MixConfig = serde_json::from_str(&raw).map_err(|source| CliError::ParseConfig {
        path: path.to_string(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}
