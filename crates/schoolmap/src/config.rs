//! CLI configuration: thin wrapper around `schoolmap_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--config, --api-url, --directions-url, --timeout).

use std::path::PathBuf;

use schoolmap_config::Config;
use schoolmap_core::MapConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// The config file this invocation reads and writes.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(schoolmap_config::config_path)
}

/// Load the layered config and apply command-line overrides on top.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = schoolmap_config::load_config(Some(&config_file(global)))?;
    if let Some(ref url) = global.api_url {
        cfg.api_url.clone_from(url);
    }
    if let Some(ref url) = global.directions_url {
        cfg.directions_url.clone_from(url);
    }
    if let Some(secs) = global.timeout {
        cfg.timeout_secs = secs;
    }
    Ok(cfg)
}

/// Build a validated [`MapConfig`] for a session.
pub fn resolve(global: &GlobalOpts) -> Result<MapConfig, CliError> {
    Ok(load(global)?.to_map_config()?)
}
