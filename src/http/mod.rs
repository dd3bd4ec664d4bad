//! HTTP client module
//!
//! Provides the outbound client used to exercise the target service.

mod client;

pub use client::{HttpClient, DEFAULT_TIMEOUT_SECS};
