//! Deadline enforcement for remote calls.
//!
//! Every backend call goes through [`bounded`] (raw outcome) or [`run`]
//! (envelope). The call future races a tokio timer; when the timer wins the
//! future is dropped, so a late response is never observed. The request may
//! still complete server-side.

use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::directus::RemoteError;
use crate::observability::metrics;
use crate::resilience::classify::describe;
use crate::resilience::envelope::Envelope;

/// Deadline applied when the configuration does not override it.
pub const DEFAULT_DEADLINE: Duration = Duration::from_millis(10_000);

/// Run `call` once under `deadline`, returning its raw outcome.
///
/// Use this where the caller needs to inspect the failure itself (the
/// authentication probe). Everything else should use [`run`].
pub async fn bounded<T, F, Fut>(
    operation: &'static str,
    deadline: Duration,
    call: F,
) -> Result<T, RemoteError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, RemoteError>>,
{
    let started = Instant::now();
    let outcome = match timeout(deadline, call()).await {
        Ok(outcome) => outcome,
        Err(_) => Err(RemoteError::Timeout {
            operation,
            after: deadline,
        }),
    };
    let elapsed = started.elapsed();

    match &outcome {
        Ok(_) => {
            tracing::debug!(operation, elapsed_ms = elapsed.as_millis() as u64, "Remote call succeeded");
            metrics::record_operation(operation, "ok", elapsed);
        }
        Err(e) => {
            let kind = crate::resilience::classify(e);
            tracing::warn!(
                operation,
                elapsed_ms = elapsed.as_millis() as u64,
                kind = %kind,
                error = %e,
                "Remote call failed"
            );
            metrics::record_operation(operation, kind.as_str(), elapsed);
        }
    }

    outcome
}

/// Run `call` once under `deadline` and normalize the outcome.
///
/// Never fails: every error, including the timeout, becomes
/// [`Envelope::Err`].
pub async fn run<T, F, Fut>(operation: &'static str, deadline: Duration, call: F) -> Envelope<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, RemoteError>>,
{
    match bounded(operation, deadline, call).await {
        Ok(data) => Envelope::Ok(data),
        Err(e) => Envelope::Err(describe(&e)),
    }
}
