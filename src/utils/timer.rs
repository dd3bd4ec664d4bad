//! Timer utilities
//!
//! Latency measurement for single cases and the optional deadline that
//! bounds a whole run.

use std::time::Duration;
use tokio::time::Instant;

/// Measures elapsed wall time from construction
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    label: String,
}

impl Timer {
    /// Create and start a new timer
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            label: label.into(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop timer and return the elapsed time
    pub fn stop(self) -> Duration {
        let elapsed = self.elapsed();
        tracing::debug!("{}: {:?}", self.label, elapsed);
        elapsed
    }
}

/// Point in time after which a run must stop; `None` never expires
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// A limit too large to represent as an instant never expires
    pub fn after(limit: Option<Duration>) -> Self {
        Self {
            at: limit.and_then(|d| Instant::now().checked_add(d)),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }

    /// Resolves once the deadline passes
    pub async fn reached(&self) {
        match self.at {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending::<()>().await,
        }
    }
}
