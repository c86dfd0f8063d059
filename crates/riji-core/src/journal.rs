//! In-memory diary state.
//!
//! Holds the merged own/paired entry collection between syncs and owns the
//! ordering rules: the collection is always sorted by date descending, and
//! every mutation preserves that invariant. All logic here is pure; network
//! effects live in [`crate::service`].

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::SyncSnapshot;
use crate::models::{DiaryEntry, EntryKind};

/// Which kinds of entry exist on a calendar date; drives the calendar marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPresence {
    None,
    Own,
    Paired,
    Both,
}

/// One year-month bucket of the grouped monthly view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGroup {
    /// `"YYYY-MM"`
    pub month: String,
    pub entries: Vec<DiaryEntry>,
}

#[derive(Debug, Default, Clone)]
pub struct Journal {
    entries: Vec<DiaryEntry>,
}

impl Journal {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Entries in date-descending order; within a date, sync order.
    #[must_use]
    pub fn entries(&self) -> &[DiaryEntry] {
        &self.entries
    }

    /// Replace the collection wholesale with a sync result: tag each entry
    /// with its kind, attach read marks (the partner's marks for own
    /// entries, the caller's for paired ones), merge and sort by date
    /// descending. Returns the merged entry count.
    pub fn reconcile(&mut self, snapshot: SyncSnapshot) -> usize {
        let SyncSnapshot {
            diaries,
            diaries_paired,
            read_marks,
            own_read_marks,
        } = snapshot;

        let mut merged: Vec<DiaryEntry> = diaries
            .into_iter()
            .map(|wire| {
                let read_mark = read_mark_for(&read_marks, wire.id);
                wire.into_entry(EntryKind::Own, read_mark)
            })
            .chain(diaries_paired.into_iter().map(|wire| {
                let read_mark = read_mark_for(&own_read_marks, wire.id);
                wire.into_entry(EntryKind::Paired, read_mark)
            }))
            .collect();

        // Stable sort keeps same-date entries in server order.
        merged.sort_by(|a, b| b.date.cmp(&a.date));

        self.entries = merged;
        self.entries.len()
    }

    /// First entry on `date`, optionally restricted to one kind.
    #[must_use]
    pub fn entry_for_date(&self, date: NaiveDate, kind: Option<EntryKind>) -> Option<&DiaryEntry> {
        self.entries
            .iter()
            .find(|entry| entry.date == date && kind.is_none_or(|k| entry.kind == k))
    }

    /// Existing entry on `date`, or a fresh draft owned by `user` when the
    /// date has none (the calendar-click behavior).
    #[must_use]
    pub fn entry_or_draft(
        &self,
        date: NaiveDate,
        kind: Option<EntryKind>,
        user: i64,
    ) -> DiaryEntry {
        self.entry_for_date(date, kind)
            .cloned()
            .unwrap_or_else(|| DiaryEntry::draft(date, user))
    }

    /// Swap a re-fetched canonical copy in for the entry with the same id.
    pub fn replace(&mut self, entry: &DiaryEntry) {
        if let Some(slot) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            *slot = entry.clone();
        }
    }

    /// Positional merge of a saved entry: an existing id is replaced in
    /// place; a new entry is inserted immediately before the first entry
    /// with an earlier date (binary search over the descending order), or
    /// at the end when none is earlier.
    pub fn upsert_saved(&mut self, entry: DiaryEntry) {
        if let Some(slot) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            *slot = entry;
            return;
        }

        let at = self.entries.partition_point(|e| e.date >= entry.date);
        self.entries.insert(at, entry);
    }

    /// Remove the entry with `id`, if present.
    pub fn remove(&mut self, id: i64) {
        self.entries.retain(|entry| entry.id != id);
    }

    /// Partition the collection by year-month. Groups come out descending
    /// because the collection is date-descending; within a group, entries
    /// keep collection order.
    #[must_use]
    pub fn grouped(&self) -> Vec<MonthGroup> {
        let mut groups: Vec<MonthGroup> = Vec::new();

        for entry in &self.entries {
            let key = entry.month_key();
            match groups.last_mut() {
                Some(group) if group.month == key => group.entries.push(entry.clone()),
                _ => groups.push(MonthGroup {
                    month: key,
                    entries: vec![entry.clone()],
                }),
            }
        }

        groups
    }

    /// Which entry kinds exist on `date`.
    #[must_use]
    pub fn presence_on(&self, date: NaiveDate) -> DayPresence {
        let mut own = false;
        let mut paired = false;
        for entry in self.entries.iter().filter(|e| e.date == date) {
            match entry.kind {
                EntryKind::Own => own = true,
                EntryKind::Paired => paired = true,
            }
        }

        match (own, paired) {
            (true, true) => DayPresence::Both,
            (true, false) => DayPresence::Own,
            (false, true) => DayPresence::Paired,
            (false, false) => DayPresence::None,
        }
    }
}

/// Absent or zero map values mean "never read".
fn read_mark_for(marks: &HashMap<String, i64>, id: i64) -> Option<i64> {
    marks.get(&id.to_string()).copied().filter(|ts| *ts != 0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::WireEntry;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn wire(id: i64, user: i64, day: &str) -> WireEntry {
        serde_json::from_str(&format!(
            r#"{{"id": {id}, "user": {user}, "createddate": "{day}", "ts": {id}0}}"#
        ))
        .unwrap()
    }

    fn snapshot(own: &[(i64, &str)], paired: &[(i64, &str)]) -> SyncSnapshot {
        SyncSnapshot {
            diaries: own.iter().map(|(id, day)| wire(*id, 7, day)).collect(),
            diaries_paired: paired.iter().map(|(id, day)| wire(*id, 8, day)).collect(),
            read_marks: HashMap::new(),
            own_read_marks: HashMap::new(),
        }
    }

    fn ids(journal: &Journal) -> Vec<i64> {
        journal.entries().iter().map(|e| e.id).collect()
    }

    #[test]
    fn reconcile_sorts_date_descending() {
        let mut journal = Journal::new();
        let count = journal.reconcile(snapshot(
            &[(1, "2025-06-01"), (2, "2025-07-10")],
            &[(3, "2025-07-20"), (4, "2024-12-31")],
        ));

        assert_eq!(count, 4);
        assert_eq!(ids(&journal), vec![3, 2, 1, 4]);
    }

    #[test]
    fn reconcile_keeps_same_date_entries_in_server_order() {
        let mut journal = Journal::new();
        journal.reconcile(snapshot(&[(1, "2025-07-10")], &[(2, "2025-07-10")]));

        // Own entries are merged ahead of paired ones; the stable sort
        // must not reorder equal dates.
        assert_eq!(ids(&journal), vec![1, 2]);
        assert_eq!(journal.entries()[0].kind, EntryKind::Own);
    }

    #[test]
    fn reconcile_attaches_read_marks_per_kind() {
        let mut snap = snapshot(&[(1, "2025-07-10")], &[(2, "2025-07-09")]);
        snap.read_marks.insert("1".to_string(), 1_751_700_000);
        snap.own_read_marks.insert("2".to_string(), 1_751_600_000);

        let mut journal = Journal::new();
        journal.reconcile(snap);

        assert_eq!(journal.entries()[0].read_mark, Some(1_751_700_000));
        assert_eq!(journal.entries()[1].read_mark, Some(1_751_600_000));
    }

    #[test]
    fn reconcile_zero_read_mark_is_none() {
        let mut snap = snapshot(&[(1, "2025-07-10")], &[]);
        snap.read_marks.insert("1".to_string(), 0);

        let mut journal = Journal::new();
        journal.reconcile(snap);
        assert_eq!(journal.entries()[0].read_mark, None);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let make = || {
            let mut snap = snapshot(
                &[(1, "2025-06-01"), (2, "2025-07-10")],
                &[(3, "2025-07-10")],
            );
            snap.read_marks.insert("1".to_string(), 42);
            snap
        };

        let mut journal = Journal::new();
        journal.reconcile(make());
        let first = journal.grouped();
        journal.reconcile(make());
        assert_eq!(journal.grouped(), first);
    }

    #[test]
    fn grouped_buckets_by_month_descending() {
        let mut journal = Journal::new();
        journal.reconcile(snapshot(
            &[(1, "2025-07-01"), (2, "2025-06-15"), (3, "2025-07-20")],
            &[(4, "2024-12-31")],
        ));

        let groups = journal.grouped();
        let months: Vec<&str> = groups.iter().map(|g| g.month.as_str()).collect();
        assert_eq!(months, vec!["2025-07", "2025-06", "2024-12"]);
        assert_eq!(
            groups[0].entries.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![3, 1]
        );
    }

    #[test]
    fn upsert_inserts_before_first_earlier_date() {
        let mut journal = Journal::new();
        journal.reconcile(snapshot(
            &[(1, "2025-07-20"), (2, "2025-07-10"), (3, "2025-06-01")],
            &[],
        ));

        let entry = wire(9, 7, "2025-07-15").into_entry(EntryKind::Own, None);
        journal.upsert_saved(entry);
        assert_eq!(ids(&journal), vec![1, 9, 2, 3]);
    }

    #[test]
    fn upsert_appends_when_no_earlier_date_exists() {
        let mut journal = Journal::new();
        journal.reconcile(snapshot(&[(1, "2025-07-20")], &[]));

        let entry = wire(9, 7, "2025-05-01").into_entry(EntryKind::Own, None);
        journal.upsert_saved(entry);
        assert_eq!(ids(&journal), vec![1, 9]);
    }

    #[test]
    fn upsert_goes_after_entries_sharing_the_date() {
        let mut journal = Journal::new();
        journal.reconcile(snapshot(&[(1, "2025-07-10")], &[(2, "2025-07-10")]));

        let entry = wire(9, 7, "2025-07-10").into_entry(EntryKind::Own, None);
        journal.upsert_saved(entry);
        assert_eq!(ids(&journal), vec![1, 2, 9]);
    }

    #[test]
    fn upsert_replaces_existing_id_in_place() {
        let mut journal = Journal::new();
        journal.reconcile(snapshot(&[(1, "2025-07-20"), (2, "2025-07-10")], &[]));

        let mut updated = wire(2, 7, "2025-07-10").into_entry(EntryKind::Own, None);
        updated.title = "revised".to_string();
        journal.upsert_saved(updated);

        assert_eq!(ids(&journal), vec![1, 2]);
        assert_eq!(journal.entries()[1].title, "revised");
    }

    #[test]
    fn remove_drops_exactly_one_entry() {
        let mut journal = Journal::new();
        journal.reconcile(snapshot(&[(1, "2025-07-20"), (2, "2025-07-10")], &[]));

        journal.remove(1);
        assert_eq!(ids(&journal), vec![2]);
    }

    #[test]
    fn entry_for_date_honors_kind_filter() {
        let mut journal = Journal::new();
        journal.reconcile(snapshot(&[(1, "2025-07-10")], &[(2, "2025-07-10")]));

        let day = date("2025-07-10");
        assert_eq!(journal.entry_for_date(day, None).unwrap().id, 1);
        assert_eq!(
            journal
                .entry_for_date(day, Some(EntryKind::Paired))
                .unwrap()
                .id,
            2
        );
        assert!(journal.entry_for_date(date("2025-01-01"), None).is_none());
    }

    #[test]
    fn entry_or_draft_creates_draft_for_empty_date() {
        let journal = Journal::new();
        let draft = journal.entry_or_draft(date("2025-07-10"), None, 7);
        assert!(draft.is_draft());
        assert_eq!(draft.user, 7);
        assert_eq!(draft.date, date("2025-07-10"));
    }

    #[test]
    fn presence_reflects_kinds_on_date() {
        let mut journal = Journal::new();
        journal.reconcile(snapshot(
            &[(1, "2025-07-10"), (2, "2025-07-09")],
            &[(3, "2025-07-10"), (4, "2025-07-08")],
        ));

        assert_eq!(journal.presence_on(date("2025-07-10")), DayPresence::Both);
        assert_eq!(journal.presence_on(date("2025-07-09")), DayPresence::Own);
        assert_eq!(journal.presence_on(date("2025-07-08")), DayPresence::Paired);
        assert_eq!(journal.presence_on(date("2025-07-07")), DayPresence::None);
    }
}
