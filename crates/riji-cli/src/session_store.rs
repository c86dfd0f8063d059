//! Keychain-backed session persistence.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use riji_core::session::{decode_stored_session, encode_session, Session, SessionStore};
use riji_core::{Error, Result};

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "riji-cli";

#[derive(Clone)]
pub struct KeychainSessionStore {
    username: String,
}

impl KeychainSessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            username: "diary_session".to_string(),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> Result<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| Error::SessionStore(error.to_string()))
    }
}

impl Default for KeychainSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for KeychainSessionStore {
    #[cfg(not(test))]
    fn load(&self) -> Result<Option<Session>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(decode_stored_session(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(Error::SessionStore(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load(&self) -> Result<Option<Session>> {
        let store = Self::test_store();
        let guard = store
            .lock()
            .map_err(|error| Error::SessionStore(error.to_string()))?;
        guard
            .get(&self.username)
            .map(|raw| decode_stored_session(raw))
            .transpose()
    }

    #[cfg(not(test))]
    fn save(&self, session: &Session) -> Result<()> {
        let raw = encode_session(session)?;
        self.entry()?
            .set_password(&raw)
            .map_err(|error| Error::SessionStore(error.to_string()))?;
        Ok(())
    }

    #[cfg(test)]
    fn save(&self, session: &Session) -> Result<()> {
        let raw = encode_session(session)?;
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| Error::SessionStore(error.to_string()))?;
        guard.insert(self.username.clone(), raw);
        Ok(())
    }

    #[cfg(not(test))]
    fn clear(&self) -> Result<()> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(Error::SessionStore(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear(&self) -> Result<()> {
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| Error::SessionStore(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}
