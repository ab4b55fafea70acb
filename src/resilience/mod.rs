//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call site (authenticate, create_vehicle, ...):
//!     → timeouts.rs (race the call against its deadline)
//!     → classify.rs (bucket the failure: code → status → message rules)
//!     → envelope.rs ({ok: true, data} | {ok: false, error})
//!     → call site translates the message for the caller if it wants to
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline; there is no other resilience policy
//! - One attempt per call, no retries, no backoff
//! - The envelope is the boundary: nothing past it returns a raw error

pub mod classify;
pub mod envelope;
pub mod timeouts;

pub use classify::{classify, describe};
pub use envelope::{Envelope, ErrorDescription, ErrorKind};
pub use timeouts::{bounded, run, DEFAULT_DEADLINE};
