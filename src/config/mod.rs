//! Configuration module
//!
//! Handles loading and managing configuration. Precedence, lowest first:
//! built-in defaults, config file, `ENDPOINT_PROBE_*` environment
//! variables, command-line flags.

mod cases;
mod env;
mod file;

pub use cases::{load_cases, validate_cases};
pub use env::EnvConfig;
pub use file::{find_config, load_default, CONFIG_LOCATIONS};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::http::DEFAULT_TIMEOUT_SECS;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL every case route is appended to
    pub target: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Upper bound for a whole run in seconds
    pub deadline_secs: Option<u64>,

    /// Case declaration file (JSON or YAML)
    pub cases_file: String,

    /// Report format (table, summary, json, json-pretty, csv, html)
    pub format: String,

    /// Report title; defaults to a timestamped one
    pub title: Option<String>,

    /// Headers sent with every request from the first case on
    pub headers: BTreeMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target: "http://localhost:8181".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            deadline_secs: None,
            cases_file: "./testinput.json".to_string(),
            format: "table".to_string(),
            title: None,
            headers: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if file::is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if file::is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.target.starts_with("http://") && !self.target.starts_with("https://") {
            anyhow::bail!(
                "Invalid target '{}': expected an http:// or https:// base URL",
                self.target
            );
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        if self.deadline_secs == Some(0) {
            anyhow::bail!("deadline_secs must be greater than zero when set");
        }
        Ok(())
    }

    /// Overlay values present in the environment
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(target) = &env.target {
            self.target = target.clone();
        }
        if let Some(timeout) = env.timeout {
            self.timeout_secs = timeout;
        }
        if let Some(deadline) = env.deadline {
            self.deadline_secs = Some(deadline);
        }
        if let Some(cases) = &env.cases {
            self.cases_file = cases.clone();
        }
        if let Some(format) = &env.format {
            self.format = format.clone();
        }
    }

    /// Generate example configuration
    pub fn example() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("x-test-run".to_string(), "local".to_string());

        Self {
            deadline_secs: Some(300),
            title: Some("Smoke tests".to_string()),
            headers,
            ..Self::default()
        }
    }
}
