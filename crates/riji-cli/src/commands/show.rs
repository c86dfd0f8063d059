use chrono::Utc;
use riji_core::models::EntryKind;

use crate::commands::common::{format_time_ago, kind_label, open_service, parse_date};
use crate::error::CliError;

pub async fn run_show(date: Option<&str>, paired: bool, api_base: &str) -> Result<(), CliError> {
    let date = parse_date(date)?;
    let kind = paired.then_some(EntryKind::Paired);

    let mut service = open_service(api_base)?;
    service.sync().await?;

    if service.journal().entry_for_date(date, kind).is_none() {
        println!("No entry on {date}.");
        return Ok(());
    }

    // Full select: re-fetches the canonical copy and records the read.
    service.select_date(date, kind).await?;
    let entry = service.selected();

    println!(
        "{} ({})  {}",
        entry.date,
        entry.date.format("%A"),
        entry.display_title()
    );

    let mut meta = vec![format!("[{}]", kind_label(entry.kind))];
    if !entry.mood.trim().is_empty() {
        meta.push(format!("mood: {}", entry.mood));
    }
    if !entry.weather.trim().is_empty() {
        meta.push(format!("weather: {}", entry.weather));
    }
    println!("{}", meta.join("   "));

    println!();
    println!("{}", entry.content);
    println!();

    let mut footer = vec![format!("{} characters", entry.char_count())];
    if entry.kind.is_own() {
        if let Some(mark) = entry.read_mark {
            footer.push(format!(
                "read by your partner {} ago",
                format_time_ago(mark, Utc::now().timestamp())
            ));
        }
    }
    println!("{}", footer.join("   "));

    Ok(())
}
