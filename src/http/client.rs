//! HTTP client for endpoint testing
//!
//! Wraps a shared `reqwest::Client` with a base URL and a per-request
//! timeout. Request construction and sending are separate steps so callers
//! can tell the two failure kinds apart.

use reqwest::{Client, Request, Response, Url};
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::models::HeaderCarry;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    #[error("Failed to read response body: {0}")]
    BodyRead(String),
}

/// HTTP client shared by every case of a run
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl HttpClient {
    /// Create a client with the default timeout
    #[cfg(test)]
    pub fn new(base_url: impl Into<String>) -> Result<Self, HttpError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    /// Create client with custom timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, HttpError> {
        let base_url = base_url.into();

        let mut builder = Client::builder().timeout(Duration::from_secs(timeout_secs));
        // Loopback targets never go through HTTP(S)_PROXY
        if is_loopback_target(&base_url) {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build full URL; the route is appended verbatim
    fn build_url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }

    /// Construct a GET request carrying every header in `carry`
    pub fn build_get(&self, route: &str, carry: &HeaderCarry) -> Result<Request, HttpError> {
        let url = self.build_url(route);

        let mut req_builder = self.client.get(&url);
        for (key, value) in carry.iter() {
            req_builder = req_builder.header(key, value);
        }

        req_builder
            .build()
            .map_err(|e| HttpError::InvalidRequest(error_chain(&e)))
    }

    /// Send a prepared request and wait for the status line.
    ///
    /// The body is left unread; see [`HttpResponse::text`].
    pub async fn execute(&self, request: Request) -> Result<HttpResponse, HttpError> {
        let url = request.url().to_string();
        debug!("Sending {} request to {}", request.method(), url);

        let response = self.client.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                HttpError::ConnectionRefused(url.clone())
            } else {
                HttpError::RequestFailed(error_chain(&e))
            }
        })?;

        let status = response.status();
        debug!(
            "Response: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );

        Ok(HttpResponse {
            status_code: status.as_u16(),
            timeout_secs: self.timeout_secs,
            inner: response,
        })
    }
}

fn is_loopback_target(base_url: &str) -> bool {
    let Ok(url) = Url::parse(base_url) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .is_ok_and(|ip| ip.is_loopback())
}

/// reqwest hides the useful part of an error in its source chain
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

/// Response whose status has arrived but whose body may still be in flight
#[derive(Debug)]
pub struct HttpResponse {
    pub status_code: u16,
    timeout_secs: u64,
    inner: Response,
}

impl HttpResponse {
    /// Read the rest of the body; a failure here leaves the status intact
    pub async fn text(self) -> Result<String, HttpError> {
        let timeout_secs = self.timeout_secs;
        self.inner.text().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(timeout_secs)
            } else {
                HttpError::BodyRead(error_chain(&e))
            }
        })
    }
}
