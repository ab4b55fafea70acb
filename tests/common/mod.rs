//! In-process mock Directus for integration tests.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use directus_bridge::config::BridgeConfig;
use directus_bridge::directus::{DirectusClient, MemorySessionStore, NoSession, SessionStore};

/// A request as the mock saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub request_id: Option<String>,
    pub body: Value,
}

impl RecordedRequest {
    /// Decoded value of a query parameter.
    pub fn query_param(&self, name: &str) -> Option<String> {
        url::form_urlencoded::parse(self.query.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: Option<Value>,
    pub delay: Duration,
}

impl MockResponse {
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// `200 {"data": data}`
pub fn data(data: Value) -> MockResponse {
    MockResponse {
        status: 200,
        body: Some(json!({ "data": data })),
        delay: Duration::ZERO,
    }
}

/// `204` with no body.
pub fn no_content() -> MockResponse {
    MockResponse {
        status: 204,
        body: None,
        delay: Duration::ZERO,
    }
}

/// Directus-style error body.
pub fn error(status: u16, message: &str, code: Option<&str>) -> MockResponse {
    let mut item = json!({ "message": message });
    if let Some(code) = code {
        item["extensions"] = json!({ "code": code });
    }
    MockResponse {
        status,
        body: Some(json!({ "errors": [item] })),
        delay: Duration::ZERO,
    }
}

type Responder = Arc<dyn Fn(&RecordedRequest) -> MockResponse + Send + Sync>;

struct Shared {
    routes: HashMap<(String, String), Responder>,
    requests: Mutex<Vec<RecordedRequest>>,
}

#[derive(Default)]
pub struct MockDirectus {
    routes: HashMap<(String, String), Responder>,
}

impl MockDirectus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route<F>(mut self, method: &str, path: &str, responder: F) -> Self
    where
        F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        self.routes
            .insert((method.to_string(), path.to_string()), Arc::new(responder));
        self
    }

    /// Serve on an ephemeral port.
    pub async fn start(self) -> RunningMock {
        let shared = Arc::new(Shared {
            routes: self.routes,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(handle).with_state(shared.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        RunningMock {
            url: format!("http://{}", addr),
            shared,
        }
    }
}

async fn handle(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let request = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().unwrap_or_default().to_string(),
        authorization: header_value("authorization"),
        request_id: header_value("x-request-id"),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };
    shared.requests.lock().unwrap().push(request.clone());

    let responder = shared
        .routes
        .get(&(request.method.clone(), request.path.clone()))
        .cloned();
    let Some(responder) = responder else {
        return error(404, "Route doesn't exist.", Some("ROUTE_NOT_FOUND")).into_response();
    };

    let response = responder(&request);
    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }
    response.into_response()
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap();
        match self.body {
            Some(body) => (
                status,
                [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
                body.to_string(),
            )
                .into_response(),
            None => status.into_response(),
        }
    }
}

pub struct RunningMock {
    pub url: String,
    shared: Arc<Shared>,
}

impl RunningMock {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn last(&self, method: &str, path: &str) -> Option<RecordedRequest> {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r.method == method && r.path == path)
    }

    /// Client with no session token.
    pub fn client(&self) -> DirectusClient {
        self.client_with(Arc::new(NoSession))
    }

    /// Client whose session carries `token`.
    pub fn client_with_token(&self, token: &str) -> DirectusClient {
        self.client_with(Arc::new(MemorySessionStore::with_token(token)))
    }

    pub fn client_with(&self, session: Arc<dyn SessionStore>) -> DirectusClient {
        let mut config = BridgeConfig::default();
        config.backend.base_url = self.url.clone();
        config.timeouts.request_ms = 2_000;
        DirectusClient::new(config, session).unwrap()
    }
}

/// Client pointed at a port nothing listens on.
pub fn unreachable_client() -> DirectusClient {
    let mut config = BridgeConfig::default();
    config.backend.base_url = "http://127.0.0.1:9".to_string();
    config.timeouts.request_ms = 2_000;
    DirectusClient::new(config, Arc::new(NoSession)).unwrap()
}
