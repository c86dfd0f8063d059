use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Datelike, Local, NaiveDate, TimeZone};
use riji_core::api::ApiClient;
use riji_core::models::{DiaryEntry, EntryKind};
use riji_core::service::DiaryService;
use riji_core::session::SessionStore;
use serde::Serialize;

use crate::error::CliError;
use crate::session_store::KeychainSessionStore;

/// Build a service around the stored session, or point at `riji login`.
pub fn open_service(api_base: &str) -> Result<DiaryService, CliError> {
    let store = KeychainSessionStore::new();
    let session = store.load()?.ok_or(CliError::NotSignedIn)?;
    let api = ApiClient::new(api_base)?;
    Ok(DiaryService::new(api, session))
}

pub fn parse_date(raw: Option<&str>) -> Result<NaiveDate, CliError> {
    raw.map_or_else(
        || Ok(Local::now().date_naive()),
        |value| {
            NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                .map_err(|_| CliError::InvalidDate(value.to_string()))
        },
    )
}

pub fn parse_month(raw: Option<&str>) -> Result<(i32, u32), CliError> {
    match raw {
        None => {
            let today = Local::now().date_naive();
            Ok((today.year(), today.month()))
        }
        Some(value) => {
            let first = NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d")
                .map_err(|_| CliError::InvalidMonth(value.to_string()))?;
            Ok((first.year(), first.month()))
        }
    }
}

/// `"YYYY-MM"`, the grouping key.
pub fn month_key(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}")
}

/// `"YYYY.MM"`, the month header shown in lists.
pub fn month_title(key: &str) -> String {
    key.replacen('-', ".", 1)
}

pub const fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Own => "self",
        EntryKind::Paired => "paired",
    }
}

/// `HH:MM` in local time; placeholder for drafts that carry no timestamp.
pub fn format_clock(timestamp: i64) -> String {
    if timestamp <= 0 {
        return "--:--".to_string();
    }
    Local
        .timestamp_opt(timestamp, 0)
        .single()
        .map_or_else(|| "--:--".to_string(), |dt| dt.format("%H:%M").to_string())
}

/// Coarsest-unit time difference, e.g. `"3 days"`.
pub fn format_time_ago(timestamp: i64, now: i64) -> String {
    let diff = now.saturating_sub(timestamp).max(0);
    let minute = 60;
    let hour = 60 * minute;
    let day = 24 * hour;
    let month = 30 * day;
    let year = 365 * day;

    if diff >= year {
        unit(diff / year, "year")
    } else if diff >= month {
        unit(diff / month, "month")
    } else if diff >= day {
        unit(diff / day, "day")
    } else if diff >= hour {
        unit(diff / hour, "hour")
    } else if diff >= minute {
        unit(diff / minute, "minute")
    } else {
        unit(diff, "second")
    }
}

fn unit(count: i64, name: &str) -> String {
    if count == 1 {
        format!("1 {name}")
    } else {
        format!("{count} {name}s")
    }
}

#[derive(Debug, Serialize)]
pub struct EntryListItem {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub title: String,
    pub preview: String,
    pub content: String,
    pub modified_at: i64,
    pub read_mark: Option<i64>,
}

pub fn entry_to_list_item(entry: &DiaryEntry) -> EntryListItem {
    EntryListItem {
        id: entry.id,
        date: entry.date,
        kind: entry.kind,
        title: entry.display_title(),
        preview: entry.preview(80),
        content: entry.content.clone(),
        modified_at: entry.modified_at,
        read_mark: entry.read_mark,
    }
}

/// One line per entry under a month header: day, weekday, time, kind,
/// title, preview.
pub fn format_entry_lines(entries: &[DiaryEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            let line = format!(
                "  {:>2} {} {}  {:<7} {:<24}  {}",
                entry.date.day(),
                entry.date.format("%a"),
                format_clock(entry.modified_at),
                kind_label(entry.kind),
                entry.display_title(),
                entry.preview(40)
            );
            line.trim_end().to_string()
        })
        .collect()
}

pub fn resolve_entry_content(initial: &str) -> Result<String, CliError> {
    if let Some(content) = read_piped_stdin()? {
        return Ok(content);
    }

    if let Some(content) = capture_editor_input_with_initial(initial)? {
        return Ok(content);
    }

    Err(CliError::EmptyContent)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn capture_editor_input_with_initial(
    initial_content: &str,
) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_entry_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let entry_content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_content(&entry_content))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            // Fallback for editor commands with args, e.g. "code --wait"
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let mut command = Command::new(program);
            command.args(parts).arg(file_path);

            let status = command.status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

fn create_temp_entry_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("riji-entry-{}-{now}.md", std::process::id()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates() {
        let date = parse_date(Some("2025-07-05")).unwrap();
        assert_eq!(date, "2025-07-05".parse().unwrap());
    }

    #[test]
    fn parse_date_defaults_to_today() {
        assert_eq!(parse_date(None).unwrap(), Local::now().date_naive());
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(matches!(
            parse_date(Some("07/05/2025")),
            Err(CliError::InvalidDate(_))
        ));
    }

    #[test]
    fn parse_month_accepts_year_month() {
        assert_eq!(parse_month(Some("2025-07")).unwrap(), (2025, 7));
    }

    #[test]
    fn parse_month_rejects_full_dates() {
        assert!(matches!(
            parse_month(Some("2025-07-05")),
            Err(CliError::InvalidMonth(_))
        ));
    }

    #[test]
    fn month_key_and_title_formats() {
        assert_eq!(month_key(2025, 7), "2025-07");
        assert_eq!(month_title("2025-07"), "2025.07");
    }

    #[test]
    fn format_clock_placeholder_for_drafts() {
        assert_eq!(format_clock(0), "--:--");
    }

    #[test]
    fn format_time_ago_uses_coarsest_unit() {
        let now = 10_000_000;
        assert_eq!(format_time_ago(now - 30, now), "30 seconds");
        assert_eq!(format_time_ago(now - 120, now), "2 minutes");
        assert_eq!(format_time_ago(now - 2 * 3600, now), "2 hours");
        assert_eq!(format_time_ago(now - 86_400, now), "1 day");
        assert_eq!(format_time_ago(now - 40 * 86_400, now), "1 month");
        assert_eq!(format_time_ago(now - 800 * 86_400, now), "2 years");
    }

    #[test]
    fn normalize_content_trims_and_rejects_empty() {
        assert_eq!(normalize_content("  hello  "), Some("hello".to_string()));
        assert_eq!(normalize_content(" \n\t "), None);
    }

    #[test]
    fn normalize_content_keeps_multiline_text() {
        assert_eq!(
            normalize_content("line 1\nline 2\n"),
            Some("line 1\nline 2".to_string())
        );
    }

    #[test]
    fn default_editor_is_defined() {
        assert!(!default_editor().is_empty());
    }

    #[test]
    fn entry_lines_carry_day_kind_and_title() {
        let mut entry = DiaryEntry::draft("2025-07-05".parse().unwrap(), 7);
        entry.title = "Hot day".to_string();
        entry.content = "We went swimming".to_string();

        let lines = format_entry_lines(&[entry]);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" 5 Sat"));
        assert!(lines[0].contains("self"));
        assert!(lines[0].contains("Hot day"));
        assert!(lines[0].contains("We went swimming"));
    }
}
