//! Authenticated session state.
//!
//! [`SessionProvider`] is the single owner that installs, refreshes and
//! clears the session. Clients only ever receive a [`SessionContext`], a
//! read-only handle onto the same state.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use mediclerk_core::models::user::UserProfile;
use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub user: UserProfile,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

type Shared = Arc<RwLock<Option<Session>>>;

#[derive(Debug, Clone, Default)]
pub struct SessionProvider {
    inner: Shared,
}

impl SessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(session))),
        }
    }

    /// Replace the current session, e.g. after login or a token refresh.
    pub fn install(&self, session: Session) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn current(&self) -> Option<Session> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn context(&self) -> SessionContext {
        SessionContext {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Read-only view of the session, injected into API clients.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Shared,
}

impl SessionContext {
    /// A context with no session; every authenticated call fails locally.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.access_token.clone())
            .filter(|t| !t.is_empty())
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer_token().is_some()
    }
}
