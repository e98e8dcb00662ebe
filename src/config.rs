// src/config.rs

//! Configuration loading utilities.
//!
//! Convenience functions for the binaries: load the TOML file, overlay
//! SMTP credentials from the environment, optionally validate.

use std::path::Path;

use crate::error::Result;
use crate::models::Config;

/// Load configuration with environment overlay, falling back to defaults.
pub fn load(path: &Path) -> Config {
    Config::load_or_default(path).overlay_env()
}

/// Load configuration and fail fast on invalid values.
///
/// Used by entry points that are about to run the pipeline, so a bad
/// config surfaces before any network call.
pub fn load_validated(path: &Path) -> Result<Config> {
    let config = load(path);
    config.validate()?;
    Ok(config)
}
