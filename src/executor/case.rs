//! Single case execution
//!
//! Issues one request, validates the response, and feeds declared actions
//! into the run's header carry state.

use tracing::{debug, warn};

use crate::conditions::{validate_conditions, ResponseBody};
use crate::http::HttpClient;
use crate::models::{HeaderCarry, TestCaseResult, TestCaseSpec};
use crate::utils::Timer;

/// Execute one case against the client's target.
///
/// Every header in `carry` is sent with the request. Values named by the
/// case's actions are written back into `carry` once the response is in,
/// so they are visible to later cases only.
pub async fn execute_case(
    client: &HttpClient,
    spec: &TestCaseSpec,
    carry: &mut HeaderCarry,
) -> TestCaseResult {
    let timer = Timer::start(format!("GET {}", spec.route));
    let mut result = TestCaseResult::new(spec.clone());

    let request = match client.build_get(&spec.route, carry) {
        Ok(request) => request,
        Err(e) => {
            warn!("Could not construct request for {}: {}", spec.route, e);
            result.add_err_msg(format!("error constructing request: {e}"));
            return result.finish();
        }
    };

    let response = match client.execute(request).await {
        Ok(response) => response,
        Err(e) => {
            warn!("Request to {} failed: {}", spec.route, e);
            result.add_err_msg(format!("error sending request: {e}"));
            return result.finish();
        }
    };

    result.response_time_us = timer.stop().as_micros() as u64;
    result.actual_return_code = Some(response.status_code);

    if spec.expect_return_code != response.status_code {
        result.add_err_msg(format!(
            "expected status code {}, got {} instead",
            spec.expect_return_code, response.status_code
        ));
    }

    // The body is only read when conditions are declared; actions on a
    // case without them therefore carry empty strings.
    let mut body = ResponseBody::new();
    if let Some(conditions) = &spec.conditions {
        let decoded = match response.text().await {
            Ok(raw) => decode_body(&raw),
            Err(e) => {
                warn!("Body of {} cut short: {}", spec.route, e);
                Err(EOF_MSG.to_string())
            }
        };
        match decoded {
            Ok(decoded) => {
                body = decoded;
                for msg in validate_conditions(conditions, &body) {
                    result.add_err_msg(msg);
                }
            }
            Err(msg) => result.add_err_msg(msg),
        }
    }

    for key in spec.actions.keys() {
        let value = body.get(key).cloned().unwrap_or_default();
        debug!("Carrying header {}={:?} to later cases", key, value);
        carry.set(key.clone(), value);
    }

    if !body.is_empty() {
        if let Ok(serialized) = serde_json::to_string(&body) {
            result.response_body = serialized;
        }
    }

    result.finish()
}

const EOF_MSG: &str = "expected body to run conditions on, but found EOF";

fn decode_body(raw: &str) -> Result<ResponseBody, String> {
    if raw.trim().is_empty() {
        return Err(EOF_MSG.to_string());
    }
    serde_json::from_str(raw)
        .map_err(|e| format!("expected body to run conditions on, but found malformed body: {e}"))
}
