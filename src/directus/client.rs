//! Directus REST transport.
//!
//! # Responsibilities
//! - Build requests against the configured base URL
//! - Attach the bearer token from the caller's session store
//! - Unwrap the `{"data": ...}` envelope on success
//! - Turn `{"errors": [...]}` bodies and bad statuses into [`RemoteError`]
//!
//! Deadlines are not enforced here; every operation wraps these calls in
//! [`crate::resilience::run`].

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use url::Url;

use crate::config::{BridgeConfig, ConfigError};
use crate::directus::error::{ApiErrorBody, ApiErrorItem, RemoteError};
use crate::directus::session::SessionStore;
use crate::observability::tracing::{new_request_id, REQUEST_ID_HEADER};

#[derive(Deserialize)]
struct Data<T> {
    data: T,
}

/// Whether a request should carry the session's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    Session,
    Anonymous,
}

/// Handle to one Directus instance.
///
/// Built once at startup and passed to whoever needs it; cloning is cheap.
#[derive(Clone)]
pub struct DirectusClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<dyn SessionStore>,
    config: Arc<BridgeConfig>,
    deadline: Duration,
}

impl DirectusClient {
    /// Create a client for `config.backend.base_url`.
    pub fn new(config: BridgeConfig, session: Arc<dyn SessionStore>) -> Result<Self, ConfigError> {
        let mut base_url = Url::parse(&config.backend.base_url).map_err(|e| {
            ConfigError::Client(format!("invalid base URL '{}': {}", config.backend.base_url, e))
        })?;
        // Url::join replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .connect_timeout(config.timeouts.connect())
            .user_agent(config.backend.user_agent.clone())
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        tracing::info!(
            base_url = %base_url,
            deadline_ms = config.timeouts.request_ms,
            "Directus client initialized"
        );

        Ok(Self {
            http,
            base_url,
            session,
            deadline: config.timeouts.request(),
            config: Arc::new(config),
        })
    }

    /// Same client with a different per-operation deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, RemoteError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| RemoteError::Transport(format!("invalid request path '{}': {}", path, e)))
    }

    fn request(&self, method: Method, path: &str, auth: Auth) -> Result<RequestBuilder, RemoteError> {
        let mut builder = self.http.request(method, self.url(path)?);

        if auth == Auth::Session {
            if let Some(token) = self.session.access_token() {
                builder = builder.bearer_auth(token);
            }
        }
        Ok(builder)
    }

    /// `GET path?query` and decode `data`.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RemoteError> {
        let request = self.request(Method::GET, path, Auth::Session)?.query(query);
        let body = self.execute(request, path).await?;
        decode_data(&body)
    }

    /// `POST path` with a JSON body and decode `data`.
    pub(crate) async fn post<B, T>(&self, path: &str, body: &B, auth: Auth) -> Result<T, RemoteError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path, auth)?.json(body);
        let body = self.execute(request, path).await?;
        decode_data(&body)
    }

    /// `POST path` where the response body is irrelevant (e.g. 204).
    pub(crate) async fn post_no_content<B>(&self, path: &str, body: &B, auth: Auth) -> Result<(), RemoteError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, path, auth)?.json(body);
        self.execute(request, path).await.map(|_| ())
    }

    /// Send with a fresh request id, which tags the header and every log
    /// event emitted while the request is in flight.
    async fn execute(&self, request: RequestBuilder, path: &str) -> Result<String, RemoteError> {
        let request_id = new_request_id();
        let span = tracing::debug_span!("directus_request", request_id = %request_id, path);
        send(request.header(REQUEST_ID_HEADER, request_id.as_str()))
            .instrument(span)
            .await
    }
}

async fn send(request: RequestBuilder) -> Result<String, RemoteError> {
    tracing::debug!("Sending request");
    let response = request.send().await.inspect_err(|e| {
        tracing::debug!(error = %e, "Request failed before a response");
    })?;
    let status = response.status();
    tracing::debug!(status = status.as_u16(), "Response received");
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v: &HeaderValue| v.to_str().ok())
        .map(|v| v.contains("json"))
        .unwrap_or(false);
    let text = response.text().await?;

    if status.is_success() {
        return Ok(text);
    }
    Err(api_error(status, is_json, &text))
}

fn decode_data<T: DeserializeOwned>(body: &str) -> Result<T, RemoteError> {
    let wrapped: Data<T> = serde_json::from_str(body)?;
    Ok(wrapped.data)
}

/// Build an [`RemoteError::Api`] from a failed response.
fn api_error(status: StatusCode, is_json: bool, body: &str) -> RemoteError {
    let parsed = if is_json || body.trim_start().starts_with('{') {
        serde_json::from_str::<ApiErrorBody>(body).ok()
    } else {
        None
    };

    let errors = match parsed {
        Some(parsed) if !parsed.errors.is_empty() => parsed.errors,
        _ => {
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body.trim().to_string()
            };
            vec![ApiErrorItem {
                message,
                extensions: None,
            }]
        }
    };

    RemoteError::Api {
        status: status.as_u16(),
        errors,
    }
}

impl std::fmt::Debug for DirectusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectusClient")
            .field("base_url", &self.base_url.as_str())
            .field("deadline_ms", &self.deadline.as_millis())
            .finish()
    }
}
