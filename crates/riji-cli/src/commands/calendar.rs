use chrono::{Datelike, NaiveDate};
use riji_core::journal::{DayPresence, Journal};

use crate::commands::common::{open_service, parse_month};
use crate::error::CliError;

pub async fn run_calendar(month: Option<&str>, api_base: &str) -> Result<(), CliError> {
    let (year, month) = parse_month(month)?;

    let mut service = open_service(api_base)?;
    service.sync().await?;

    for line in render_calendar(service.journal(), year, month) {
        println!("{line}");
    }
    Ok(())
}

const fn presence_mark(presence: DayPresence) -> char {
    match presence {
        DayPresence::None => ' ',
        DayPresence::Own => '*',
        DayPresence::Paired => '+',
        DayPresence::Both => '#',
    }
}

/// Month grid with one mark per day showing whose entries exist there.
pub fn render_calendar(journal: &Journal, year: i32, month: u32) -> Vec<String> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return vec![format!("{year:04}.{month:02} is not a valid month")];
    };

    let mut lines = Vec::new();
    lines.push(format!("{:^27}", format!("{year:04}.{month:02}")));
    lines.push("Mo  Tu  We  Th  Fr  Sa  Su".to_string());

    let offset = first.weekday().num_days_from_monday() as usize;
    let mut cells: Vec<String> = vec!["   ".to_string(); offset];

    for day in 1..=days_in_month(year, month) {
        let mark = NaiveDate::from_ymd_opt(year, month, day)
            .map_or(' ', |date| presence_mark(journal.presence_on(date)));
        cells.push(format!("{day:>2}{mark}"));
    }

    for week in cells.chunks(7) {
        lines.push(week.join(" ").trim_end().to_string());
    }

    lines.push(String::new());
    lines.push("marks: * yours   + partner's   # both".to_string());
    lines
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| chrono::NaiveDate::pred_opt(&d))
        .map_or(30, |last| last.day())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use riji_core::api::SyncSnapshot;

    use super::*;

    fn journal_with(own: &[&str], paired: &[&str]) -> Journal {
        let wire = |id: i64, user: i64, day: &str| {
            serde_json::from_str(&format!(
                r#"{{"id": {id}, "user": {user}, "createddate": "{day}", "ts": 1}}"#
            ))
            .unwrap()
        };

        let mut journal = Journal::new();
        journal.reconcile(SyncSnapshot {
            diaries: own
                .iter()
                .enumerate()
                .map(|(i, day)| wire(i as i64 + 1, 7, day))
                .collect(),
            diaries_paired: paired
                .iter()
                .enumerate()
                .map(|(i, day)| wire(i as i64 + 100, 8, day))
                .collect(),
            ..SyncSnapshot::default()
        });
        journal
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn calendar_marks_days_by_presence() {
        let journal = journal_with(&["2025-07-05", "2025-07-10"], &["2025-07-10", "2025-07-20"]);
        let rendered = render_calendar(&journal, 2025, 7).join("\n");

        assert!(rendered.contains("2025.07"));
        assert!(rendered.contains(" 5*"));
        assert!(rendered.contains("10#"));
        assert!(rendered.contains("20+"));
        assert!(rendered.contains(" 4 "));
    }

    #[test]
    fn calendar_starts_on_the_right_weekday() {
        let journal = Journal::new();
        let lines = render_calendar(&journal, 2025, 7);

        // July 2025 begins on a Tuesday: one leading blank cell.
        assert_eq!(lines[1], "Mo  Tu  We  Th  Fr  Sa  Su");
        assert!(lines[2].starts_with("     1"));
    }

    #[test]
    fn calendar_covers_every_day_once() {
        let journal = Journal::new();
        let rendered = render_calendar(&journal, 2025, 2).join("\n");
        assert!(rendered.contains("28"));
        assert!(!rendered.contains("29"));
    }
}
