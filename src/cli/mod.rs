//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

/// Declarative HTTP endpoint test runner
#[derive(Parser, Debug)]
#[command(name = "endpoint-probe")]
#[command(version)]
#[command(about = "Run declarative HTTP GET test cases against a service")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Configuration file (defaults to the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run all cases in order and print the report
    Run(RunArgs),

    /// List the cases in a case file
    List(ListArgs),

    /// Check a case file without sending requests
    Validate(ValidateArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Case file (JSON or YAML)
    #[arg(long)]
    pub cases: Option<String>,

    /// Target base URL, e.g. http://localhost:8181
    #[arg(short, long)]
    pub target: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Deadline for the whole run in seconds
    #[arg(long)]
    pub deadline: Option<u64>,

    /// Output format (table, summary, json, json-pretty, csv, html)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Report title
    #[arg(long)]
    pub title: Option<String>,

    /// Header sent from the first case on (KEY:VALUE, repeatable)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Also write the report to this file (format from extension)
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Case file (JSON or YAML)
    #[arg(long)]
    pub cases: Option<String>,

    /// Show conditions and actions
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Case file (JSON or YAML)
    #[arg(long)]
    pub cases: Option<String>,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write an example configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "./endpoint-probe.yaml")]
        output: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show {
        /// Show environment overrides only
        #[arg(long)]
        env: bool,

        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },
}

/// Split a `KEY:VALUE` header argument
pub fn parse_header(raw: &str) -> Option<(String, String)> {
    let (key, value) = raw.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}
