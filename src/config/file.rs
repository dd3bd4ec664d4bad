//! Configuration file discovery
//!
//! Finds the configuration file in the standard locations.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::AppConfig;

/// Configuration file locations (in order of precedence)
pub const CONFIG_LOCATIONS: &[&str] = &[
    "./endpoint-probe.yaml",
    "./endpoint-probe.yml",
    "./endpoint-probe.json",
    "./.endpoint-probe.yaml",
    "~/.config/endpoint-probe/config.yaml",
    "~/.endpoint-probe.yaml",
];

/// Find configuration file in standard locations
pub fn find_config() -> Option<PathBuf> {
    CONFIG_LOCATIONS
        .iter()
        .map(|location| expand_path(location))
        .find(|path| path.exists())
}

/// Load configuration from the first standard location, or defaults
pub fn load_default() -> Result<AppConfig> {
    match find_config() {
        Some(path) => {
            debug!("Using config file {}", path.display());
            AppConfig::load(&path)
        }
        None => Ok(AppConfig::default()),
    }
}

/// Expand `~/` to the home directory
pub(crate) fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if file is YAML based on extension
pub(crate) fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}
