//! Authenticated session context.
//!
//! The session is explicit state rather than something read from a global:
//! it is set when the user signs in, cleared when they sign out, and every
//! user-scoped store call receives the [`Session`] it acts for.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Backend user id; the row-level-security key on every table.
    pub user_id: String,
    /// Bearer token sent with every request.
    pub access_token: String,
    pub email: Option<String>,
}

/// Shared handle to the current session.  Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a session after a successful sign-in.
    pub fn set(&self, session: Session) {
        info!(user = %session.user_id, "session started");
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    /// Drop the session on sign-out, returning it if there was one.
    pub fn clear(&self) -> Option<Session> {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(ref s) = previous {
            info!(user = %s.user_id, "session ended");
        }
        previous
    }

    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The current session, or [`StoreError::Unauthenticated`].
    pub fn require(&self) -> Result<Session> {
        self.current().ok_or(StoreError::Unauthenticated)
    }
}
