//! Diary entry model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel id carried by drafts that have never been written to the server.
pub const DRAFT_ID: i64 = -1;

/// Who authored an entry, from the viewer's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Authored by the signed-in user
    #[serde(rename = "self")]
    Own,
    /// Authored by the linked partner account, read-only to the viewer
    Paired,
}

impl EntryKind {
    #[must_use]
    pub const fn is_own(self) -> bool {
        matches!(self, Self::Own)
    }
}

/// Account-side theming tag carried on every entry. Data only; the client
/// never branches on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Space {
    #[serde(rename = "boy")]
    Boy,
    #[serde(rename = "girl")]
    Girl,
    #[default]
    #[serde(rename = "")]
    Unset,
}

/// One diary record for a specific date.
///
/// Wire fields come back from the server verbatim; `kind` and `read_mark`
/// are client-side projections attached during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    /// Server-assigned id; [`DRAFT_ID`] until the first successful write
    pub id: i64,
    /// Owning account id
    pub user: i64,
    pub title: String,
    pub content: String,
    /// Calendar date the entry belongs to
    #[serde(rename = "createddate")]
    pub date: NaiveDate,
    /// Creation instant, epoch seconds; absent on drafts
    #[serde(rename = "createdtime")]
    pub created_at: Option<i64>,
    /// Last modification instant, epoch seconds
    #[serde(rename = "ts")]
    pub modified_at: i64,
    #[serde(default)]
    pub msg_count: i64,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub weather: String,
    #[serde(default)]
    pub space: Space,
    /// Viewer-side authorship tag
    pub kind: EntryKind,
    /// When the counterpart viewed this entry, epoch seconds
    pub read_mark: Option<i64>,
}

impl DiaryEntry {
    /// Create an empty unsaved draft for `date`, owned by `user`.
    #[must_use]
    pub fn draft(date: NaiveDate, user: i64) -> Self {
        Self {
            id: DRAFT_ID,
            user,
            title: String::new(),
            content: String::new(),
            date,
            created_at: None,
            modified_at: 0,
            msg_count: 0,
            mood: String::new(),
            weather: String::new(),
            space: Space::Unset,
            kind: EntryKind::Own,
            read_mark: None,
        }
    }

    /// Whether this entry has never been written to the server.
    #[must_use]
    pub const fn is_draft(&self) -> bool {
        self.id <= 0
    }

    /// `"YYYY-MM"` bucket key used by the monthly grouping.
    #[must_use]
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    /// Title shown in lists; falls back to the date when empty.
    #[must_use]
    pub fn display_title(&self) -> String {
        if self.title.trim().is_empty() {
            self.date.format("%Y-%m-%d").to_string()
        } else {
            self.title.clone()
        }
    }

    /// Content length with all whitespace stripped.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.content.chars().filter(|c| !c.is_whitespace()).count()
    }

    /// First content line, truncated to `max_chars` with an ellipsis.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> String {
        let first_line = self.content.lines().next().unwrap_or("").trim();
        let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

        if collapsed.chars().count() <= max_chars {
            collapsed
        } else {
            let take_len = max_chars.saturating_sub(3);
            let mut truncated = collapsed.chars().take(take_len).collect::<String>();
            truncated.push_str("...");
            truncated
        }
    }
}
