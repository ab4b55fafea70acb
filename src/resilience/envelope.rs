//! The uniform success/failure wrapper returned by every bounded call.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Coarse classification of a failed remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Timeout,
    MalformedResponse,
    DuplicateResource,
    ValidationFailure,
    PermissionDenied,
    NotFound,
    NetworkOrServerError,
    Unknown,
}

impl ErrorKind {
    /// Stable label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::DuplicateResource => "duplicate_resource",
            ErrorKind::ValidationFailure => "validation_failure",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::NotFound => "not_found",
            ErrorKind::NetworkOrServerError => "network_or_server_error",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable failure plus its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDescription {
    pub kind: ErrorKind,
    pub message: String,
    /// Original backend message, kept when `message` was replaced by a
    /// friendlier one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorDescription {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    /// Replace the message with a friendlier one, keeping the original as
    /// `detail`. The kind never changes.
    pub fn translate<F>(self, friendly: F) -> Self
    where
        F: FnOnce(ErrorKind, &str) -> Option<String>,
    {
        match friendly(self.kind, &self.message) {
            Some(message) if message != self.message => Self {
                kind: self.kind,
                detail: Some(self.message),
                message,
            },
            _ => self,
        }
    }
}

impl fmt::Display for ErrorDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl std::error::Error for ErrorDescription {}

/// Outcome of a bounded remote operation: exactly one of data or error.
///
/// Serializes as `{"ok": true, "data": ...}` or
/// `{"ok": false, "error": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope<T> {
    Ok(T),
    Err(ErrorDescription),
}

impl<T> Envelope<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Envelope::Ok(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Envelope::Ok(data) => Some(data),
            Envelope::Err(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorDescription> {
        match self {
            Envelope::Ok(_) => None,
            Envelope::Err(err) => Some(err),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Envelope<U> {
        match self {
            Envelope::Ok(data) => Envelope::Ok(f(data)),
            Envelope::Err(err) => Envelope::Err(err),
        }
    }

    pub fn map_err<F>(self, f: F) -> Self
    where
        F: FnOnce(ErrorDescription) -> ErrorDescription,
    {
        match self {
            Envelope::Ok(data) => Envelope::Ok(data),
            Envelope::Err(err) => Envelope::Err(f(err)),
        }
    }

    /// Falls back to `default` on failure.
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Envelope::Ok(data) => data,
            Envelope::Err(_) => default,
        }
    }

    pub fn into_result(self) -> Result<T, ErrorDescription> {
        self.into()
    }
}

impl<T> From<Result<T, ErrorDescription>> for Envelope<T> {
    fn from(result: Result<T, ErrorDescription>) -> Self {
        match result {
            Ok(data) => Envelope::Ok(data),
            Err(err) => Envelope::Err(err),
        }
    }
}

impl<T> From<Envelope<T>> for Result<T, ErrorDescription> {
    fn from(envelope: Envelope<T>) -> Self {
        match envelope {
            Envelope::Ok(data) => Ok(data),
            Envelope::Err(err) => Err(err),
        }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Envelope", 2)?;
        match self {
            Envelope::Ok(data) => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("data", data)?;
            }
            Envelope::Err(err) => {
                state.serialize_field("ok", &false)?;
                state.serialize_field("error", err)?;
            }
        }
        state.end()
    }
}
