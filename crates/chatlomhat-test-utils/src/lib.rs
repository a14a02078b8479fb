//! chatlomhat-test-utils: a scriptable stand-in for the math backend.
//!
//! ```ignore
//! let backend = MockBackend::builder()
//!     .route("/health", MockResponse::json(200, json!({ "status": "healthy" })))
//!     .spawn()
//!     .await;
//! let client = BackendClient::new(BackendConfig::resolve(Some(&backend.url()), RuntimeEnv::Test));
//! ```
//!
//! Every request is recorded so tests can assert on exactly what was forwarded.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A canned reply for one path.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    /// Held back this long before replying.
    pub delay: Option<Duration>,
}

impl MockResponse {
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".to_string()),
            body: value.to_string().into_bytes(),
            delay: None,
        }
    }

    pub fn text(status: u16, content_type: &str, body: &str) -> Self {
        Self {
            status,
            content_type: Some(content_type.to_string()),
            body: body.as_bytes().to_vec(),
            delay: None,
        }
    }

    /// A reply without any `Content-Type` header.
    pub fn raw(status: u16, body: &str) -> Self {
        Self { status, content_type: None, body: body.as_bytes().to_vec(), delay: None }
    }

    /// Accept the request, then answer only after `delay`.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Accept the request and never answer within any test's lifetime.
    pub fn stalled() -> Self {
        Self::raw(200, "").delayed(Duration::from_secs(3600))
    }
}

/// What the mock saw on the wire.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

struct Inner {
    routes: HashMap<String, MockResponse>,
    captured: Mutex<Vec<CapturedRequest>>,
}

#[derive(Default)]
pub struct MockBackendBuilder {
    routes: HashMap<String, MockResponse>,
}

impl MockBackendBuilder {
    pub fn route(mut self, path: &str, response: MockResponse) -> Self {
        self.routes.insert(path.to_string(), response);
        self
    }

    /// Bind to an ephemeral loopback port and start serving.
    pub async fn spawn(self) -> MockBackend {
        let inner = Arc::new(Inner {
            routes: self.routes,
            captured: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(handle).with_state(inner.clone());
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");

        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Mock backend stopped: {}", e);
            }
        });

        MockBackend { addr, inner, task }
    }
}

pub struct MockBackend {
    addr: SocketAddr,
    inner: Arc<Inner>,
    task: JoinHandle<()>,
}

impl MockBackend {
    pub fn builder() -> MockBackendBuilder {
        MockBackendBuilder::default()
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.inner.captured.lock().expect("captured requests lock").clone()
    }

    pub fn request_count(&self) -> usize {
        self.inner.captured.lock().expect("captured requests lock").len()
    }

    /// Requests for one path only, so background health probes don't interfere.
    pub fn requests_to(&self, path: &str) -> Vec<CapturedRequest> {
        self.requests().into_iter().filter(|r| r.path == path).collect()
    }

    pub fn request_count_to(&self, path: &str) -> usize {
        self.requests_to(path).len()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A URL nothing listens on, for transport-failure tests.
pub fn unreachable_url() -> String {
    "http://127.0.0.1:9".to_string()
}

async fn handle(
    State(inner): State<Arc<Inner>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    inner
        .captured
        .lock()
        .expect("captured requests lock")
        .push(CapturedRequest { method, path: path.clone(), content_type, body: body.to_vec() });

    let Some(reply) = inner.routes.get(&path) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    let mut builder = Response::builder()
        .status(StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR));
    if let Some(content_type) = &reply.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder
        .body(Body::from(reply.body.clone()))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
