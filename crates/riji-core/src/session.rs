//! Bearer-token session and its persistence seam.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Credentials returned by a successful login. Lifecycle spans login to
/// logout; passed explicitly to every network-calling component.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub userid: i64,
}

impl Session {
    #[must_use]
    pub const fn new(token: String, userid: i64) -> Self {
        Self { token, userid }
    }

    /// Value of the `auth` header the API expects.
    #[must_use]
    pub fn auth_header(&self) -> String {
        format!("token {}", self.token)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("userid", &self.userid)
            .finish()
    }
}

/// Durable storage for a [`Session`]. The CLI backs this with the OS
/// keychain; logout clears it alongside the in-memory copy.
pub trait SessionStore {
    fn load(&self) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Helper for store implementations serializing through JSON.
pub fn decode_stored_session(raw: &str) -> Result<Session> {
    serde_json::from_str(raw).map_err(|error| Error::SessionStore(error.to_string()))
}

/// Helper for store implementations serializing through JSON.
pub fn encode_session(session: &Session) -> Result<String> {
    serde_json::to_string(session).map_err(|error| Error::SessionStore(error.to_string()))
}
