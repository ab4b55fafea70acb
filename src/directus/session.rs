//! Read access to the caller's session.
//!
//! The session store belongs to the caller. Operations only read it to
//! attach the bearer token; nothing in this crate writes to it except the
//! caller through [`MemorySessionStore::set`].

use arc_swap::ArcSwapOption;
use std::sync::Arc;

use crate::directus::types::AuthUser;

/// What the session store knows right now.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub user: Option<AuthUser>,
}

/// Synchronous, read-only view of the caller's session.
pub trait SessionStore: Send + Sync {
    fn snapshot(&self) -> Option<SessionSnapshot>;

    /// Bearer token for authorized requests.
    fn access_token(&self) -> Option<String> {
        self.snapshot().and_then(|s| s.token)
    }
}

/// A store with nothing in it; every request goes out anonymous.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSession;

impl SessionStore for NoSession {
    fn snapshot(&self) -> Option<SessionSnapshot> {
        None
    }
}

/// In-process session store for callers that have no store of their own.
///
/// Reads are lock-free; writes swap the whole snapshot.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    current: ArcSwapOption<SessionSnapshot>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set(SessionSnapshot {
            token: Some(token.into()),
            user: None,
        });
        store
    }

    pub fn set(&self, snapshot: SessionSnapshot) {
        self.current.store(Some(Arc::new(snapshot)));
    }

    pub fn clear(&self) {
        self.current.store(None);
    }
}

impl SessionStore for MemorySessionStore {
    fn snapshot(&self) -> Option<SessionSnapshot> {
        self.current.load_full().map(|s| s.as_ref().clone())
    }
}
