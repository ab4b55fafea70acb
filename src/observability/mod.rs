//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every bounded call produces:
//!     → logging.rs (structured log events, secrets never included)
//!     → metrics.rs (counters and histograms by operation/outcome)
//!     → tracing.rs (request id header for backend-side correlation)
//! ```

pub mod logging;
pub mod metrics;
pub mod tracing;
