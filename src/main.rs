//! endpoint-probe - declarative HTTP endpoint test runner
//!
//! Loads an ordered list of GET test cases, runs them one after another
//! against a target service, and reports which responses matched their
//! expected status code and body conditions.
//!
//! Values named in a case's `Actions` are read from its JSON response and
//! sent as request headers on every later case of the same run, which is
//! how a login token reaches the cases after the login.
//!
//! ## Usage
//!
//! ```bash
//! # Run the cases in ./testinput.json against the default target
//! endpoint-probe run
//!
//! # Run a YAML case file against another host, bounded to one minute
//! endpoint-probe run --cases smoke.yaml --target http://10.0.0.5:8080 --deadline 60
//!
//! # Write an HTML report next to the table output
//! endpoint-probe run --output report.html
//!
//! # Inspect a case file
//! endpoint-probe list --cases smoke.yaml --detailed
//! endpoint-probe validate --cases smoke.yaml
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod cli;
mod conditions;
mod config;
mod executor;
mod http;
mod models;
mod output;
mod utils;

use cli::Args;
use config::{AppConfig, EnvConfig};
use executor::TestRunner;
use models::TestCaseSpec;
use output::{OutputFormat, ResultFormatter};
use utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let env = EnvConfig::load();

    let level = LogLevel::resolve(
        args.log_level.as_deref().or(env.log_level.as_deref()),
        args.verbose,
    );
    init_logger(level);

    let config_path = args.config.clone().or_else(|| env.config_file.clone());

    match args.command {
        cli::Command::Run(run_args) => {
            let config = resolve_config(config_path.as_deref(), &env)?;
            let all_passed = run_cases(run_args, config).await?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        cli::Command::List(list_args) => {
            let config = resolve_config(config_path.as_deref(), &env)?;
            list_cases(list_args, &config)?;
        }
        cli::Command::Validate(validate_args) => {
            let config = resolve_config(config_path.as_deref(), &env)?;
            validate_case_file(validate_args, &config)?;
        }
        cli::Command::Config(config_args) => {
            manage_config(config_args, config_path.as_deref(), &env)?;
        }
    }

    Ok(())
}

/// Defaults, then config file, then environment
fn resolve_config(path: Option<&str>, env: &EnvConfig) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::load(path)?,
        None => config::load_default()?,
    };
    config.apply_env(env);
    Ok(config)
}

async fn run_cases(args: cli::RunArgs, mut config: AppConfig) -> Result<bool> {
    if let Some(cases) = args.cases {
        config.cases_file = cases;
    }
    if let Some(target) = args.target {
        config.target = target;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    if args.deadline.is_some() {
        config.deadline_secs = args.deadline;
    }
    if let Some(format) = args.format {
        config.format = format;
    }
    if args.title.is_some() {
        config.title = args.title;
    }
    for raw in &args.headers {
        let (key, value) = cli::parse_header(raw)
            .ok_or_else(|| anyhow::anyhow!("Invalid header '{raw}', expected KEY:VALUE"))?;
        config.headers.insert(key, value);
    }
    config.validate()?;

    let format = OutputFormat::from_str(&config.format)
        .ok_or_else(|| anyhow::anyhow!("Unknown output format: {}", config.format))?;

    let cases = config::load_cases(&config.cases_file)?;
    info!(
        "Loaded {} cases from {} (target {})",
        cases.len(),
        config.cases_file,
        config.target
    );

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, aborting the current case");
                cancel.cancel();
            }
        });
    }

    let runner = TestRunner::from_config(&config)?.with_cancellation(cancel);
    let result = runner.run(&cases).await;

    println!("{}", ResultFormatter::new(format).format_run(&result)?);

    if let Some(output_path) = &args.output {
        let path = Path::new(output_path);
        let file_format = OutputFormat::from_path(path).unwrap_or(format);
        output::write_report_to_file(path, &result, file_format)?;
        info!("Report written to {}", path.display());
    }

    Ok(result.is_all_passed())
}

fn list_cases(args: cli::ListArgs, config: &AppConfig) -> Result<()> {
    let path = args.cases.as_deref().unwrap_or(config.cases_file.as_str());
    let cases = config::load_cases(path)?;

    println!("\nTest cases in {path} ({} total)\n", cases.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for (index, case) in cases.iter().enumerate() {
        println!(
            "  {:3}. {:40} expect {}",
            index + 1,
            case.route,
            case.expect_return_code
        );
        if args.detailed {
            print_case_details(case);
        }
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    Ok(())
}

fn print_case_details(case: &TestCaseSpec) {
    for (key, conditions) in case.conditions.iter().flatten() {
        for condition in conditions {
            println!("         {key} {condition}");
        }
    }
    for key in case.actions.keys() {
        println!("         carry {key} -> header");
    }
}

fn validate_case_file(args: cli::ValidateArgs, config: &AppConfig) -> Result<()> {
    let path = args.cases.as_deref().unwrap_or(config.cases_file.as_str());

    let cases = match config::load_cases(path) {
        Ok(cases) => cases,
        Err(e) => {
            println!("✗ Case file is invalid: {path}");
            println!("  Error: {e:#}");
            return Err(e);
        }
    };

    let issues = config::validate_cases(&cases);
    if issues.is_empty() {
        println!("✓ Case file is valid: {path} ({} cases)", cases.len());
    } else {
        println!("⚠ Case file loaded with {} warning(s): {path}", issues.len());
        for issue in &issues {
            println!("  - {issue}");
        }
    }
    Ok(())
}

fn manage_config(args: cli::ConfigArgs, path: Option<&str>, env: &EnvConfig) -> Result<()> {
    match args.action {
        cli::ConfigAction::Init { output, force } => {
            let path = Path::new(&output);
            if path.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {output}. Use --force to overwrite."
                );
            }

            AppConfig::example().save(path)?;
            println!("✓ Configuration file created: {output}");
            println!("\nEdit the file to customize your settings.");
        }

        cli::ConfigAction::Show { env: env_only, format } => {
            if env_only {
                env.print_summary();
            } else {
                match path.map(str::to_string).or_else(|| {
                    config::find_config().map(|p| p.to_string_lossy().to_string())
                }) {
                    Some(source) => println!("# Source: {source}"),
                    None => println!(
                        "# Source: defaults (searched {})",
                        config::CONFIG_LOCATIONS.join(", ")
                    ),
                }

                let config = resolve_config(path, env)?;
                let output = if format == "json" {
                    serde_json::to_string_pretty(&config).context("Failed to serialize config")?
                } else {
                    serde_yaml::to_string(&config).context("Failed to serialize config")?
                };
                println!("{output}");
            }
        }
    }

    Ok(())
}
