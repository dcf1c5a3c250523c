//! CLI session persistence with secure keychain storage.

#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use exportdesk_core::{Error, Result, Session, SessionStore};

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "exportdesk";
#[cfg(not(test))]
const KEYRING_SESSION_USERNAME: &str = "admin_session";

/// Session store backed by the OS keyring; the stored token survives process
/// restarts until explicit logout.
#[derive(Clone, Default)]
pub struct KeyringSessionStore;

impl KeyringSessionStore {
    pub const fn new() -> Self {
        Self
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<Option<String>> {
        static STORE: OnceLock<Mutex<Option<String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(None))
    }

    #[cfg(not(test))]
    fn entry() -> Result<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, KEYRING_SESSION_USERNAME)
            .map_err(|error| Error::Storage(error.to_string()))
    }
}

impl SessionStore for KeyringSessionStore {
    #[cfg(not(test))]
    fn load(&self) -> Result<Option<Session>> {
        let entry = Self::entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(Error::Storage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load(&self) -> Result<Option<Session>> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        match guard.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    #[cfg(not(test))]
    fn save(&self, session: &Session) -> Result<()> {
        let raw = serde_json::to_string(session)?;
        Self::entry()?
            .set_password(&raw)
            .map_err(|error| Error::Storage(error.to_string()))
    }

    #[cfg(test)]
    fn save(&self, session: &Session) -> Result<()> {
        let raw = serde_json::to_string(session)?;
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *guard = Some(raw);
        Ok(())
    }

    #[cfg(not(test))]
    fn clear(&self) -> Result<()> {
        let entry = Self::entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(Error::Storage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear(&self) -> Result<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *guard = None;
        Ok(())
    }
}
