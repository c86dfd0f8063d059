//! Error types for riji-core

use thiserror::Error;

/// Result type alias using riji-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in riji-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed JSON payload
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-2xx HTTP status
    #[error("API returned status {0}")]
    Status(u16),

    /// Application-level error code in an otherwise well-formed response
    #[error("API returned error code {0}")]
    Api(i64),

    /// Typed login failure
    #[error(transparent)]
    Login(#[from] LoginError),

    /// Entry missing from an `all_by_ids` response
    #[error("Entry {0} not found on the server")]
    EntryNotFound(i64),

    /// Well-formed 2xx response missing a field the operation needs
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Paired entries are read-only to the viewer
    #[error("Paired entries are read-only; you cannot erase your partner's memories")]
    PairedReadOnly,

    /// Operation requires a server-assigned id
    #[error("Entry has never been saved; nothing to do")]
    DraftNotPersisted,

    /// Session persistence failure
    #[error("Secure storage error: {0}")]
    SessionStore(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Login failures the service distinguishes via its `error` codes.
///
/// Code 1 arrives with HTTP 403, codes 2 and 4 with 200.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    #[error("Account is not a valid email address")]
    MalformedEmail,
    #[error("Wrong password")]
    WrongPassword,
    #[error("Account does not exist")]
    AccountNotFound,
    #[error("Login failed for an unknown reason (code {0}); try again later")]
    Other(i64),
}
