//! Test execution runner
//!
//! Drives an ordered list of cases against one target and aggregates the
//! results into a [`RunResult`].

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::execute_case;
use crate::config::AppConfig;
use crate::http::HttpClient;
use crate::models::{HeaderCarry, RunResult, TestCaseResult, TestCaseSpec};
use crate::utils::{Deadline, Timer};

/// Why a run stopped before its last case
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunAbort {
    #[error("run cancelled")]
    Cancelled,

    #[error("run deadline exceeded")]
    DeadlineExceeded,
}

/// Sequential runner for declarative cases
pub struct TestRunner {
    client: HttpClient,
    deadline: Option<Duration>,
    cancel: CancellationToken,
    title: Option<String>,
    seed_headers: BTreeMap<String, String>,
}

impl TestRunner {
    /// Create a runner against `target` with a per-request timeout
    pub fn new(target: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = HttpClient::with_timeout(target, timeout_secs)
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            deadline: None,
            cancel: CancellationToken::new(),
            title: None,
            seed_headers: BTreeMap::new(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let runner = Self::new(&config.target, config.timeout_secs)?
            .with_deadline(config.deadline_secs.map(Duration::from_secs))
            .with_seed_headers(config.headers.clone());

        Ok(match &config.title {
            Some(title) => runner.with_title(title),
            None => runner,
        })
    }

    /// Bound the whole run; `None` lets it run to completion
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Headers present on every request from the first case on
    pub fn with_seed_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.seed_headers = headers;
        self
    }

    pub fn target(&self) -> &str {
        self.client.base_url()
    }

    /// Run all cases, starting from the seed headers
    pub async fn run(&self, cases: &[TestCaseSpec]) -> RunResult {
        let mut carry: HeaderCarry = self.seed_headers.clone().into_iter().collect();
        self.run_with_carry(cases, &mut carry).await
    }

    /// Run all cases, threading `carry` through every one of them.
    ///
    /// Cases run strictly one after another in list order. A case sees the
    /// headers produced by the actions of every case before it and none of
    /// those after it, so reordering the list changes what is sent.
    pub async fn run_with_carry(
        &self,
        cases: &[TestCaseSpec],
        carry: &mut HeaderCarry,
    ) -> RunResult {
        let timer = Timer::start("run");
        let deadline = Deadline::after(self.deadline);
        let total = cases.len();

        let mut result = match &self.title {
            Some(title) => RunResult::titled(title.clone(), self.target(), total),
            None => RunResult::new(self.target(), total),
        };

        info!("Starting run of {} cases against {}", total, self.target());

        for (index, spec) in cases.iter().enumerate() {
            if let Some(abort) = self.abort_reason(&deadline) {
                warn!("{} before test {} of {}", abort, index + 1, total);
                result.aborted = Some(abort.to_string());
                break;
            }

            info!("Running test {} of {}", index + 1, total);

            let outcome = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(RunAbort::Cancelled),
                _ = deadline.reached() => Err(RunAbort::DeadlineExceeded),
                case_result = execute_case(&self.client, spec, carry) => Ok(case_result),
            };

            match outcome {
                Ok(case_result) => {
                    info!("  {}", case_result);
                    result.test_cases.push(case_result);
                }
                Err(abort) => {
                    warn!("{} during test {} of {}", abort, index + 1, total);
                    let mut interrupted = TestCaseResult::new(spec.clone());
                    interrupted.add_err_msg(format!("{abort} before case completed"));
                    result.test_cases.push(interrupted.finish());
                    result.aborted = Some(abort.to_string());
                    break;
                }
            }
        }

        result.total_duration_ms = timer.stop().as_millis() as u64;

        info!(
            "Run completed in {}ms - Pass: {}/{} ({:.1}%)",
            result.total_duration_ms,
            result.passed(),
            result.total(),
            result.pass_rate()
        );

        result
    }

    fn abort_reason(&self, deadline: &Deadline) -> Option<RunAbort> {
        if self.cancel.is_cancelled() {
            Some(RunAbort::Cancelled)
        } else if deadline.is_expired() {
            Some(RunAbort::DeadlineExceeded)
        } else {
            None
        }
    }
}
