//! Error classification.
//!
//! Resolution order:
//! 1. Backend error code (`errors[].extensions.code`)
//! 2. Unambiguous HTTP status (401, 403, 404, 409)
//! 3. Degraded mode: substring rules over the backend message, for servers
//!    and proxies that answer without codes
//! 4. Remaining status ranges (5xx, 422)
//!
//! The result is advisory. It picks a friendlier message but never turns a
//! failure into a success or the other way around.

use crate::directus::RemoteError;
use crate::resilience::envelope::{ErrorDescription, ErrorKind};

fn kind_for_code(code: &str) -> Option<ErrorKind> {
    let kind = match code {
        "RECORD_NOT_UNIQUE" => ErrorKind::DuplicateResource,
        "FAILED_VALIDATION" | "INVALID_PAYLOAD" | "INVALID_QUERY" | "CONTAINS_NULL_VALUES"
        | "NOT_NULL_VIOLATION" | "VALUE_TOO_LONG" | "VALUE_OUT_OF_RANGE"
        | "INVALID_FOREIGN_KEY" => ErrorKind::ValidationFailure,
        "FORBIDDEN" | "INVALID_CREDENTIALS" | "INVALID_TOKEN" | "TOKEN_EXPIRED"
        | "UNAUTHORIZED" => ErrorKind::PermissionDenied,
        "ROUTE_NOT_FOUND" => ErrorKind::NotFound,
        "SERVICE_UNAVAILABLE" | "INTERNAL_SERVER_ERROR" | "REQUESTS_EXCEEDED" => {
            ErrorKind::NetworkOrServerError
        }
        _ => return None,
    };
    Some(kind)
}

/// Substring rules for messages that arrive without a code.
const MESSAGE_RULES: &[(&str, ErrorKind)] = &[
    ("duplicate", ErrorKind::DuplicateResource),
    ("already exists", ErrorKind::DuplicateResource),
    ("has to be unique", ErrorKind::DuplicateResource),
    ("validation", ErrorKind::ValidationFailure),
    ("permission", ErrorKind::PermissionDenied),
    ("forbidden", ErrorKind::PermissionDenied),
];

fn kind_for_message(message: &str) -> Option<ErrorKind> {
    let lowered = message.to_ascii_lowercase();
    MESSAGE_RULES
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, kind)| *kind)
}

/// Bucket a remote failure into an [`ErrorKind`].
pub fn classify(err: &RemoteError) -> ErrorKind {
    match err {
        RemoteError::Timeout { .. } => ErrorKind::Timeout,
        RemoteError::Decode(_) | RemoteError::MalformedResponse(_) => {
            ErrorKind::MalformedResponse
        }
        RemoteError::Validation(_) => ErrorKind::ValidationFailure,
        RemoteError::Transport(_) => ErrorKind::NetworkOrServerError,
        RemoteError::Api { status, errors } => {
            if let Some(kind) = err.codes().find_map(kind_for_code) {
                return kind;
            }
            match status {
                401 | 403 => return ErrorKind::PermissionDenied,
                404 => return ErrorKind::NotFound,
                409 => return ErrorKind::DuplicateResource,
                _ => {}
            }
            if let Some(kind) = errors.iter().find_map(|e| kind_for_message(&e.message)) {
                return kind;
            }
            match status {
                500..=599 => ErrorKind::NetworkOrServerError,
                422 => ErrorKind::ValidationFailure,
                _ => ErrorKind::Unknown,
            }
        }
    }
}

/// Classify and keep the backend's own wording as the message.
pub fn describe(err: &RemoteError) -> ErrorDescription {
    let message = match err {
        // Our own wording is the useful part for these.
        RemoteError::Timeout { .. } | RemoteError::Transport(_) | RemoteError::Decode(_) => {
            err.to_string()
        }
        _ => err.raw_message(),
    };
    ErrorDescription::new(classify(err), message)
}
