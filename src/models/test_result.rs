//! Test result models
//!
//! Defines per-case results, their status, and the aggregate run result.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::TestCaseSpec;

/// Case outcome as shown in reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    /// No response was received
    Error,
}

impl TestStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            TestStatus::Pass => "✓",
            TestStatus::Fail => "✗",
            TestStatus::Error => "!",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "PASS"),
            TestStatus::Fail => write!(f, "FAIL"),
            TestStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Result of a single case execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestCaseResult {
    #[serde(rename = "case")]
    pub spec: TestCaseSpec,
    /// Absent when the request was never answered
    pub actual_return_code: Option<u16>,
    /// Time until the status line arrived
    pub response_time_us: u64,
    pub success: bool,
    /// Decoded response body re-serialized for reporting
    pub response_body: String,
    pub err_messages: Vec<String>,
}

impl TestCaseResult {
    pub fn new(spec: TestCaseSpec) -> Self {
        Self {
            spec,
            actual_return_code: None,
            response_time_us: 0,
            success: false,
            response_body: String::new(),
            err_messages: Vec::new(),
        }
    }

    pub fn add_err_msg(&mut self, msg: impl Into<String>) {
        self.err_messages.push(msg.into());
    }

    /// Seal the result; success iff no error was recorded
    pub fn finish(mut self) -> Self {
        self.success = self.err_messages.is_empty();
        self
    }

    /// Latency in fractional milliseconds, for display
    pub fn response_time_ms(&self) -> f64 {
        self.response_time_us as f64 / 1000.0
    }

    pub fn status(&self) -> TestStatus {
        if self.success {
            TestStatus::Pass
        } else if self.actual_return_code.is_none() {
            TestStatus::Error
        } else {
            TestStatus::Fail
        }
    }
}

impl fmt::Display for TestCaseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.status();
        write!(
            f,
            "{} {} {} [{:.2}ms]",
            status.symbol(),
            status,
            self.spec,
            self.response_time_ms()
        )?;
        for msg in &self.err_messages {
            write!(f, "\n    - {msg}")?;
        }
        Ok(())
    }
}

/// Aggregate result of one run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunResult {
    pub title: String,
    pub started_at: DateTime<Utc>,
    pub target: String,
    /// Number of cases the run was asked to execute
    pub planned: usize,
    pub test_cases: Vec<TestCaseResult>,
    pub total_duration_ms: u64,
    /// Set when cancellation or the run deadline stopped the run early
    pub aborted: Option<String>,
}

impl RunResult {
    pub fn new(target: impl Into<String>, planned: usize) -> Self {
        Self::titled(default_title(), target, planned)
    }

    pub fn titled(title: impl Into<String>, target: impl Into<String>, planned: usize) -> Self {
        Self {
            title: title.into(),
            started_at: Utc::now(),
            target: target.into(),
            planned,
            test_cases: Vec::with_capacity(planned),
            total_duration_ms: 0,
            aborted: None,
        }
    }

    pub fn total(&self) -> usize {
        self.test_cases.len()
    }

    pub fn passed(&self) -> usize {
        self.test_cases.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Cases that never ran because the run was aborted
    pub fn not_run(&self) -> usize {
        self.planned.saturating_sub(self.total())
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            (self.passed() as f64 / self.total() as f64) * 100.0
        }
    }

    /// Whole-number percentage, rounded down
    pub fn success_percentage(&self) -> u32 {
        if self.total() == 0 {
            0
        } else {
            (self.passed() * 100 / self.total()) as u32
        }
    }

    pub fn is_all_passed(&self) -> bool {
        self.aborted.is_none() && self.passed() == self.planned
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.title, self.target)?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for result in &self.test_cases {
            writeln!(f, "  {result}")?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Not run: {}",
            self.total(),
            self.passed(),
            self.failed(),
            self.not_run()
        )?;
        if let Some(reason) = &self.aborted {
            writeln!(f, "Aborted: {reason}")?;
        }
        writeln!(
            f,
            "Success: {}% | Duration: {}ms",
            self.success_percentage(),
            self.total_duration_ms
        )
    }
}

/// Report title stamped with the local wall-clock time
pub fn default_title() -> String {
    format!("Testresult from {}", Local::now().format("%-I:%M%p"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(success: bool, code: Option<u16>) -> TestCaseResult {
        let mut r = TestCaseResult::new(TestCaseSpec::new("/", 200));
        r.actual_return_code = code;
        if !success {
            r.add_err_msg("boom");
        }
        r.finish()
    }

    #[test]
    fn test_finish_sets_success() {
        let ok = result(true, Some(200));
        assert!(ok.success);
        assert_eq!(ok.status(), TestStatus::Pass);

        let failed = result(false, Some(500));
        assert!(!failed.success);
        assert_eq!(failed.status(), TestStatus::Fail);

        let errored = result(false, None);
        assert_eq!(errored.status(), TestStatus::Error);
    }

    #[test]
    fn test_run_statistics() {
        let mut run = RunResult::titled("run", "http://localhost", 4);
        run.test_cases.push(result(true, Some(200)));
        run.test_cases.push(result(true, Some(200)));
        run.test_cases.push(result(false, Some(404)));

        assert_eq!(run.total(), 3);
        assert_eq!(run.passed(), 2);
        assert_eq!(run.failed(), 1);
        assert_eq!(run.not_run(), 1);
        assert_eq!(run.success_percentage(), 66);
        assert!((run.pass_rate() - 66.666).abs() < 0.01);
        assert!(!run.is_all_passed());
    }

    #[test]
    fn test_empty_run() {
        let run = RunResult::titled("run", "http://localhost", 0);
        assert_eq!(run.pass_rate(), 0.0);
        assert_eq!(run.success_percentage(), 0);
        assert!(run.is_all_passed());
    }

    #[test]
    fn test_sub_millisecond_latency_is_kept() {
        let mut r = result(true, Some(200));
        r.response_time_us = 153;
        assert!((r.response_time_ms() - 0.153).abs() < f64::EPSILON);
        assert!(r.to_string().ends_with("[0.15ms]"));
    }

    #[test]
    fn test_default_title() {
        assert!(default_title().starts_with("Testresult from "));
    }
}
