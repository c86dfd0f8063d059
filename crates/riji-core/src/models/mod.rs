//! Data models shared across riji

pub mod entry;

pub use entry::{DiaryEntry, EntryKind, Space, DRAFT_ID};
