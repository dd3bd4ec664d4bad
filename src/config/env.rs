//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "ENDPOINT_PROBE";

/// Overrides read from `ENDPOINT_PROBE_*` variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Target base URL from ENDPOINT_PROBE_TARGET
    pub target: Option<String>,
    /// Per-request timeout from ENDPOINT_PROBE_TIMEOUT
    pub timeout: Option<u64>,
    /// Run deadline from ENDPOINT_PROBE_DEADLINE
    pub deadline: Option<u64>,
    /// Case file from ENDPOINT_PROBE_CASES
    pub cases: Option<String>,
    /// Report format from ENDPOINT_PROBE_FORMAT
    pub format: Option<String>,
    /// Config file from ENDPOINT_PROBE_CONFIG
    pub config_file: Option<String>,
    /// Log level from ENDPOINT_PROBE_LOG_LEVEL
    pub log_level: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            target: get_env("TARGET"),
            timeout: get_env_parse("TIMEOUT"),
            deadline: get_env_parse("DEADLINE"),
            cases: get_env("CASES"),
            format: get_env("FORMAT"),
            config_file: get_env("CONFIG"),
            log_level: get_env("LOG_LEVEL"),
        }
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {ENV_PREFIX}_TARGET:    {:?}", self.target);
        println!("  {ENV_PREFIX}_TIMEOUT:   {:?}", self.timeout);
        println!("  {ENV_PREFIX}_DEADLINE:  {:?}", self.deadline);
        println!("  {ENV_PREFIX}_CASES:     {:?}", self.cases);
        println!("  {ENV_PREFIX}_FORMAT:    {:?}", self.format);
        println!("  {ENV_PREFIX}_CONFIG:    {:?}", self.config_file);
        println!("  {ENV_PREFIX}_LOG_LEVEL: {:?}", self.log_level);
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}"))
        .ok()
        .filter(|v| !v.is_empty())
}

/// Get and parse environment variable; unparsable values are ignored
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}
