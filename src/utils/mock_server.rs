//! Scripted HTTP server for tests
//!
//! Serves canned JSON responses per path from an axum fallback handler and
//! records every request it receives, in arrival order.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Canned response for one path
#[derive(Clone, Debug)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
    /// Drop the connection after the first body chunk
    pub truncated: bool,
}

impl MockResponse {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: None,
            truncated: false,
        }
    }

    pub fn status(status: u16) -> Self {
        Self::json(status, "")
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn truncated(mut self) -> Self {
        self.truncated = true;
        self
    }

    fn into_body(self) -> Body {
        if !self.truncated {
            return Body::from(self.body);
        }
        // Status and first chunk are flushed before the stream fails
        let first = stream::iter([Ok::<_, std::io::Error>(Bytes::from(self.body))]);
        let abort = stream::once(async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Err::<Bytes, _>(std::io::Error::new(
                std::io::ErrorKind::ConnectionAborted,
                "connection dropped mid-body",
            ))
        });
        Body::from_stream(first.chain(abort))
    }
}

/// A request as the server saw it
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone)]
struct MockState {
    routes: Arc<HashMap<String, MockResponse>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Bind an ephemeral port; unknown paths answer 404 with an empty body
    pub async fn start(routes: Vec<(&str, MockResponse)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");

        let state = MockState {
            routes: Arc::new(
                routes
                    .into_iter()
                    .map(|(path, response)| (path.to_string(), response))
                    .collect(),
            ),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let requests = Arc::clone(&state.requests);

        let app = Router::new().fallback(respond).with_state(state);
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn respond(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let path = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string());

    state
        .requests
        .lock()
        .expect("requests lock")
        .push(RecordedRequest {
            method,
            path: path.clone(),
            headers,
        });

    let response = state
        .routes
        .get(&path)
        .cloned()
        .unwrap_or_else(|| MockResponse::status(404));

    if let Some(delay) = response.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        response.into_body(),
    )
        .into_response()
}
