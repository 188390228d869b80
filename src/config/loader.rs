//! Configuration loading from disk.
//!
//! Parsing only; semantic validation runs in `main` after process-environment
//! overrides have been applied, so a config file with an empty upstream
//! section plus `SERVER_URL` in the environment validates as one unit.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ForwarderConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ForwarderConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ForwarderConfig = toml::from_str(&content)?;
    Ok(config)
}
