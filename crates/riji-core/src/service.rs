//! Entry reconciliation controller.
//!
//! Composes the API client, the session, and the in-memory journal, and
//! drives the sync/select/save/delete flows with their gating rules. All
//! network calls are sequential from the caller's perspective; the only
//! spawned task is the best-effort read-mark update.

use chrono::{Local, NaiveDate};

use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::journal::Journal;
use crate::models::{DiaryEntry, EntryKind};
use crate::session::Session;

/// Entry counts of one sync round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    pub own: usize,
    pub paired: usize,
}

pub struct DiaryService {
    api: ApiClient,
    session: Session,
    journal: Journal,
    selected: DiaryEntry,
    edit_mode: bool,
}

impl DiaryService {
    /// Starts with today's entry selected (an empty draft until the first
    /// sync proves otherwise).
    #[must_use]
    pub fn new(api: ApiClient, session: Session) -> Self {
        let selected = DiaryEntry::draft(today(), session.userid);
        Self {
            api,
            session,
            journal: Journal::new(),
            selected,
            edit_mode: false,
        }
    }

    #[must_use]
    pub const fn journal(&self) -> &Journal {
        &self.journal
    }

    #[must_use]
    pub const fn selected(&self) -> &DiaryEntry {
        &self.selected
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Fetch the full server state and replace the local collection.
    pub async fn sync(&mut self) -> Result<SyncStats> {
        let snapshot = self.api.sync(&self.session).await?;
        let stats = SyncStats {
            own: snapshot.diaries.len(),
            paired: snapshot.diaries_paired.len(),
        };
        self.journal.reconcile(snapshot);
        tracing::info!(
            "Synced {} own and {} paired entries",
            stats.own,
            stats.paired
        );
        Ok(stats)
    }

    /// Select an entry. Persisted entries are re-fetched for freshness and
    /// trigger a fire-and-forget read-mark update; drafts are selected
    /// directly. No-op while in edit mode.
    pub async fn select(&mut self, entry: DiaryEntry) -> Result<()> {
        if self.edit_mode {
            return Ok(());
        }

        if entry.is_draft() {
            self.selected = entry;
            return Ok(());
        }

        let fresh = self.api.fetch_by_id(&self.session, entry.user, entry.id).await?;
        let full = fresh.into_entry(entry.kind, entry.read_mark);
        self.journal.replace(&full);
        self.spawn_read_mark_update(full.id);
        self.selected = full;
        Ok(())
    }

    /// Select whatever exists on `date` (a fresh draft when nothing does).
    pub async fn select_date(&mut self, date: NaiveDate, kind: Option<EntryKind>) -> Result<()> {
        let entry = self
            .journal
            .entry_or_draft(date, kind, self.session.userid);
        self.select(entry).await
    }

    /// Enter edit mode. A selected paired entry is not editable; selection
    /// is redirected to the caller's own entry for that date first.
    pub async fn enter_edit(&mut self) -> Result<()> {
        if !self.selected.kind.is_own() {
            let date = self.selected.date;
            self.select_date(date, Some(EntryKind::Own)).await?;
        }
        self.edit_mode = true;
        Ok(())
    }

    /// Leave edit mode, discarding local edits.
    pub fn cancel_edit(&mut self) {
        self.edit_mode = false;
    }

    /// Write `entry`, re-fetch the canonical copy, and merge it into the
    /// collection positionally. Returns `None` without side effects when
    /// not in edit mode. `stay_in_edit` keeps edit mode after a successful
    /// save.
    pub async fn save(
        &mut self,
        entry: DiaryEntry,
        stay_in_edit: bool,
    ) -> Result<Option<DiaryEntry>> {
        if !self.edit_mode {
            return Ok(None);
        }

        let written = self.api.write(&self.session, &entry).await?;
        let fresh = self
            .api
            .fetch_by_id(&self.session, written.user, written.id)
            .await?;
        let saved = fresh.into_entry(entry.kind, entry.read_mark);

        self.journal.upsert_saved(saved.clone());
        self.selected = saved.clone();
        if !stay_in_edit {
            self.edit_mode = false;
        }
        Ok(Some(saved))
    }

    /// Delete the selected entry. Only own, persisted entries qualify;
    /// afterwards selection falls back to today's entry.
    pub async fn delete_selected(&mut self) -> Result<DiaryEntry> {
        let entry = self.selected.clone();
        if !entry.kind.is_own() {
            return Err(Error::PairedReadOnly);
        }
        if entry.is_draft() {
            return Err(Error::DraftNotPersisted);
        }

        self.api.delete(&self.session, entry.id).await?;
        self.journal.remove(entry.id);
        self.reset_selection();
        Ok(entry)
    }

    fn reset_selection(&mut self) {
        self.selected = self
            .journal
            .entry_or_draft(today(), None, self.session.userid);
    }

    fn spawn_read_mark_update(&self, id: i64) {
        let api = self.api.clone();
        let session = self.session.clone();
        tokio::spawn(async move {
            if let Err(error) = api.update_read_mark(&session, id).await {
                tracing::warn!("Failed to update read mark for entry {id}: {error}");
            }
        });
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SyncSnapshot;

    fn service() -> DiaryService {
        let api = ApiClient::new("https://example.invalid").unwrap();
        DiaryService::new(api, Session::new("tok".to_string(), 7))
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn persisted(id: i64, day: &str, kind: EntryKind) -> DiaryEntry {
        let wire: crate::api::WireEntry = serde_json::from_str(&format!(
            r#"{{"id": {id}, "user": 8, "createddate": "{day}", "ts": 1}}"#
        ))
        .unwrap();
        wire.into_entry(kind, None)
    }

    #[test]
    fn starts_on_todays_draft() {
        let service = service();
        assert!(service.selected().is_draft());
        assert_eq!(service.selected().date, today());
        assert_eq!(service.selected().user, 7);
        assert!(!service.is_edit_mode());
    }

    #[tokio::test]
    async fn select_is_noop_in_edit_mode() {
        let mut service = service();
        service.edit_mode = true;

        let before = service.selected().clone();
        service
            .select(persisted(3, "2025-07-01", EntryKind::Own))
            .await
            .unwrap();
        assert_eq!(*service.selected(), before);
    }

    #[tokio::test]
    async fn select_draft_skips_network() {
        let mut service = service();
        let draft = DiaryEntry::draft(date("2025-07-01"), 7);
        service.select(draft.clone()).await.unwrap();
        assert_eq!(*service.selected(), draft);
    }

    #[tokio::test]
    async fn save_outside_edit_mode_is_noop() {
        let mut service = service();
        let draft = DiaryEntry::draft(date("2025-07-01"), 7);
        let outcome = service.save(draft, false).await.unwrap();
        assert!(outcome.is_none());
        assert!(service.journal().entries().is_empty());
    }

    #[tokio::test]
    async fn enter_edit_redirects_off_paired_entries() {
        let mut service = service();
        service.selected = persisted(3, "2025-07-01", EntryKind::Paired);

        // No own entry exists for the date, so the redirect lands on a
        // draft and never touches the network.
        service.enter_edit().await.unwrap();
        assert!(service.is_edit_mode());
        assert!(service.selected().kind.is_own());
        assert!(service.selected().is_draft());
        assert_eq!(service.selected().date, date("2025-07-01"));
    }

    #[tokio::test]
    async fn delete_rejects_paired_entries() {
        let mut service = service();
        service.selected = persisted(3, "2025-07-01", EntryKind::Paired);

        let error = service.delete_selected().await.unwrap_err();
        assert!(matches!(error, Error::PairedReadOnly));
        assert_eq!(service.selected().id, 3);
    }

    #[tokio::test]
    async fn delete_rejects_drafts() {
        let mut service = service();
        service.selected = DiaryEntry::draft(date("2025-07-01"), 7);

        let error = service.delete_selected().await.unwrap_err();
        assert!(matches!(error, Error::DraftNotPersisted));
    }

    #[test]
    fn reset_selection_prefers_todays_existing_entry() {
        let mut service = service();
        let today_str = today().format("%Y-%m-%d").to_string();
        service.journal.reconcile(SyncSnapshot {
            diaries: vec![serde_json::from_str(&format!(
                r#"{{"id": 5, "user": 7, "createddate": "{today_str}", "ts": 1}}"#
            ))
            .unwrap()],
            ..SyncSnapshot::default()
        });

        service.reset_selection();
        assert_eq!(service.selected().id, 5);

        service.journal.remove(5);
        service.reset_selection();
        assert!(service.selected().is_draft());
        assert_eq!(service.selected().date, today());
    }

    #[test]
    fn cancel_edit_leaves_edit_mode() {
        let mut service = service();
        service.edit_mode = true;
        service.cancel_edit();
        assert!(!service.is_edit_mode());
    }
}
