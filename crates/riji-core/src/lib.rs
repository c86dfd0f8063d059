//! riji-core - Core library for riji
//!
//! This crate contains the shared models, the remote API client, and the
//! entry reconciliation logic used by the riji command-line interface.

pub mod api;
pub mod error;
pub mod journal;
pub mod models;
pub mod service;
pub mod session;

pub use error::{Error, LoginError, Result};
pub use models::{DiaryEntry, EntryKind, Space, DRAFT_ID};
pub use session::Session;
