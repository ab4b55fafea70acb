//! Request correlation.
//!
//! Every outgoing request carries a fresh UUID v4 in `X-Request-Id`. The
//! client opens a `directus_request` span with the same id, so the debug
//! events of that request carry it too.

use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}
