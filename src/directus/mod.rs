//! Directus integration subsystem.
//!
//! # Data Flow
//! ```text
//! BridgeConfig + SessionStore (caller-owned, read-only here)
//!     → client.rs (HTTP transport, bearer token, {data}/{errors} bodies)
//!     → auth.rs / vehicles.rs / users.rs (one bounded call each)
//!     → Envelope<T> or a documented fallback value
//! ```
//!
//! # Security Constraints
//! - Passwords and tokens are redacted from Debug output and never logged
//! - Login and refresh never send the session's bearer token

pub mod auth;
pub mod client;
pub mod error;
pub mod plate_rules;
pub mod session;
pub mod types;
pub mod users;
pub mod vehicles;

pub use auth::{AuthCheck, AuthStatus};
pub use client::DirectusClient;
pub use error::{ApiErrorExtensions, ApiErrorItem, RemoteError};
pub use plate_rules::{PlateRules, RestrictionGroup};
pub use session::{MemorySessionStore, NoSession, SessionSnapshot, SessionStore};
pub use types::{
    Account, AccountInput, AuthUser, Credentials, RecordId, Session, TokenSet, UserRecord,
    UserRecordInput, UserSummary, Vehicle,
};
