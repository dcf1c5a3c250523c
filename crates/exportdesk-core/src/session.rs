//! Session state and credential storage.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Authenticated identity state held by the client after login.
///
/// `is_authenticated` is derived from token presence, so the invariant
/// "authenticated iff the token is non-empty" cannot be violated by
/// construction.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub is_first_login: bool,
}

impl Session {
    /// Builds an authenticated session from a freshly issued token.
    pub fn new(token: impl Into<String>, is_first_login: bool) -> Self {
        Self {
            token: token.into(),
            is_first_login,
        }
    }

    /// True when a non-empty token is held.
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("is_authenticated", &self.is_authenticated())
            .field("is_first_login", &self.is_first_login)
            .finish()
    }
}

/// Persistence backend for the session token.
///
/// The token must survive process restarts until explicit logout; interfaces
/// plug in their platform store (the CLI uses the OS keyring).
pub trait SessionStore: Clone + Send + Sync + 'static {
    fn load(&self) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// In-memory session store for tests and ephemeral sessions.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<Session>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let guard = self
            .slot
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Process-wide credential store.
///
/// Explicit context object passed to every component that needs session
/// data; writes happen only through the auth client (`login`, `logout`,
/// `set_password`), reads through [`CredentialStore::current`].
#[derive(Clone)]
pub struct CredentialStore<S: SessionStore> {
    current: Arc<Mutex<Session>>,
    store: S,
}

impl<S: SessionStore> CredentialStore<S> {
    /// Builds the store, restoring any persisted session into memory.
    ///
    /// An unreadable persisted session is discarded; the user simply signs
    /// in again.
    pub fn new(store: S) -> Result<Self> {
        let restored = match store.load() {
            Ok(session) => session.unwrap_or_default(),
            Err(error) => {
                tracing::warn!("Failed to restore persisted session: {error}");
                store.clear()?;
                Session::default()
            }
        };
        Ok(Self {
            current: Arc::new(Mutex::new(restored)),
            store,
        })
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Session {
        self.current.lock().map_or_else(
            |poisoned| poisoned.into_inner().clone(),
            |guard| guard.clone(),
        )
    }

    /// Non-empty token, if one is held.
    pub fn token(&self) -> Option<String> {
        let session = self.current();
        if session.is_authenticated() {
            Some(session.token)
        } else {
            None
        }
    }

    /// Replaces the session and persists it.
    pub(crate) fn set(&self, session: Session) -> Result<()> {
        self.store.save(&session)?;
        let mut guard = self
            .current
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *guard = session;
        Ok(())
    }

    /// Clears all session state unconditionally. Idempotent.
    pub fn clear(&self) -> Result<()> {
        self.store.clear()?;
        let mut guard = self
            .current
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *guard = Session::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_iff_token_non_empty() {
        assert!(!Session::default().is_authenticated());
        assert!(Session::new("tok-1", false).is_authenticated());
        assert!(!Session::new("", true).is_authenticated());
    }

    #[test]
    fn debug_redacts_token() {
        let session = Session::new("secret-token", false);
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn new_store_restores_persisted_session() {
        let backend = MemorySessionStore::new();
        backend.save(&Session::new("tok-1", true)).unwrap();

        let credentials = CredentialStore::new(backend).unwrap();
        let session = credentials.current();
        assert!(session.is_authenticated());
        assert!(session.is_first_login);
    }

    #[test]
    fn set_then_current_round_trips() {
        let credentials = CredentialStore::new(MemorySessionStore::new()).unwrap();
        credentials.set(Session::new("tok-2", false)).unwrap();

        assert_eq!(credentials.token().as_deref(), Some("tok-2"));
        assert!(credentials.current().is_authenticated());
    }

    #[test]
    fn clear_is_idempotent_and_total() {
        let backend = MemorySessionStore::new();
        let credentials = CredentialStore::new(backend.clone()).unwrap();
        credentials.set(Session::new("tok-3", true)).unwrap();

        credentials.clear().unwrap();
        credentials.clear().unwrap();

        let session = credentials.current();
        assert!(!session.is_authenticated());
        assert!(session.token.is_empty());
        assert!(!session.is_first_login);
        assert_eq!(backend.load().unwrap(), None);
    }

    #[test]
    fn token_is_none_when_logged_out() {
        let credentials = CredentialStore::new(MemorySessionStore::new()).unwrap();
        assert_eq!(credentials.token(), None);
    }
}
