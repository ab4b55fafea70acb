//! Metrics collection.
//!
//! Emitted through the `metrics` facade; without an installed recorder the
//! calls are no-ops.
//!
//! # Metrics
//! - `directus_operations_total` (counter): bounded calls by operation, outcome
//! - `directus_operation_duration_seconds` (histogram): time until the call settled

use std::time::Duration;

/// Record one settled bounded call. `outcome` is `ok` or an error kind label.
pub fn record_operation(operation: &'static str, outcome: &'static str, elapsed: Duration) {
    metrics::counter!(
        "directus_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!(
        "directus_operation_duration_seconds",
        "operation" => operation
    )
    .record(elapsed.as_secs_f64());
}

/// Record the verdict of an authentication check.
pub fn record_auth_check(status: &'static str, refreshed: bool) {
    metrics::counter!(
        "directus_auth_checks_total",
        "status" => status,
        "refreshed" => if refreshed { "true" } else { "false" }
    )
    .increment(1);
}
