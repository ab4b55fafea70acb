//! Transport-level errors and the backend error payload.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Error codes Directus reports for authentication failures.
const AUTH_ERROR_CODES: &[&str] = &[
    "INVALID_CREDENTIALS",
    "INVALID_TOKEN",
    "TOKEN_EXPIRED",
    "FORBIDDEN",
    "UNAUTHORIZED",
];

/// Message fragments that signal a rejected token when no code is present.
const AUTH_MESSAGE_HINTS: &[&str] = &[
    "token",
    "unauthorized",
    "unauthenticated",
    "authentication",
    "credentials",
];

/// One entry of a Directus `{"errors": [...]}` response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrorItem {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub extensions: Option<ApiErrorExtensions>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrorExtensions {
    #[serde(default)]
    pub code: Option<String>,
}

impl ApiErrorItem {
    /// Machine-readable error code, if the backend supplied one.
    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref().and_then(|e| e.code.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<ApiErrorItem>,
}

/// Everything that can go wrong with a single remote call.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// Connection, DNS or TLS failure before a response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {}", first_message(.errors))]
    Api {
        status: u16,
        errors: Vec<ApiErrorItem>,
    },

    /// The response body could not be decoded.
    #[error("could not decode response: {0}")]
    Decode(String),

    /// The response decoded but lacks a field the operation requires.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Input rejected locally, before any request was issued.
    #[error("{0}")]
    Validation(String),

    /// The deadline elapsed before the call settled.
    #[error("timed out after {} ms while {operation}", .after.as_millis())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

fn first_message(errors: &[ApiErrorItem]) -> &str {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .find(|m| !m.is_empty())
        .unwrap_or("no error message")
}

impl RemoteError {
    /// HTTP status of the failed response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend error codes carried by the response, in order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        let errors: &[ApiErrorItem] = match self {
            RemoteError::Api { errors, .. } => errors,
            _ => &[],
        };
        errors.iter().filter_map(ApiErrorItem::code)
    }

    /// The backend's own message, without our prefix.
    pub fn raw_message(&self) -> String {
        match self {
            RemoteError::Api { errors, .. } => first_message(errors).to_string(),
            RemoteError::Validation(msg) | RemoteError::MalformedResponse(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// True when the backend rejected the caller's credentials or token.
    ///
    /// Only backend responses count; a timeout or transport error never
    /// says anything about the token.
    pub fn is_auth_failure(&self) -> bool {
        let RemoteError::Api { status, errors } = self else {
            return false;
        };
        if matches!(status, 401 | 403) {
            return true;
        }
        if self.codes().any(|code| AUTH_ERROR_CODES.contains(&code)) {
            return true;
        }
        // Degraded mode: uncoded 4xx bodies, matched on message text. A coded
        // error or a server error is never read as a token problem.
        if !(400..500).contains(status) || self.codes().next().is_some() {
            return false;
        }
        errors.iter().any(|e| {
            let msg = e.message.to_ascii_lowercase();
            AUTH_MESSAGE_HINTS.iter().any(|hint| msg.contains(hint))
        })
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RemoteError::Decode(err.to_string())
        } else {
            RemoteError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::Decode(err.to_string())
    }
}
