//! CLI configuration utilities

use acmesh_core::OperatorConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file, under the platform config directory
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("acmesh-operator").join("config.toml"))
}

/// Load operator configuration
///
/// An explicit path must exist. Without one, the default file is used when
/// present, and environment variables alone otherwise.
pub fn load_operator_config(path: Option<&Path>) -> Result<OperatorConfig> {
    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|path| path.exists()),
    };

    debug!("Using configuration file: {:?}", path);
    OperatorConfig::load(path.as_deref()).with_context(|| match &path {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Failed to load configuration from environment".to_string(),
    })
}
