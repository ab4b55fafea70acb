//! Client-side integration layer for a Directus backend.
//!
//! Every remote operation is one request raced against a deadline and
//! normalized into an [`Envelope`]. See [`DirectusClient`] for the
//! operations.

pub mod config;
pub mod directus;
pub mod observability;
pub mod resilience;

pub use config::BridgeConfig;
pub use directus::DirectusClient;
pub use resilience::{Envelope, ErrorDescription, ErrorKind};
