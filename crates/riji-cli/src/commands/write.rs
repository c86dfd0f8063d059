use crate::commands::common::{open_service, parse_date, resolve_entry_content};
use crate::error::CliError;

pub async fn run_write(
    date: Option<&str>,
    title: Option<String>,
    mood: Option<String>,
    weather: Option<String>,
    api_base: &str,
) -> Result<(), CliError> {
    let date = parse_date(date)?;

    let mut service = open_service(api_base)?;
    service.sync().await?;
    service.select_date(date, None).await?;
    // Entering edit mode redirects off a partner entry to our own.
    service.enter_edit().await?;

    let mut entry = service.selected().clone();
    entry.content = resolve_entry_content(&entry.content)?;
    if let Some(title) = title {
        entry.title = title;
    }
    if let Some(mood) = mood {
        entry.mood = mood;
    }
    if let Some(weather) = weather {
        entry.weather = weather;
    }

    match service.save(entry, false).await? {
        Some(saved) => println!("Saved {} (id {})", saved.date, saved.id),
        None => println!("Nothing saved."),
    }
    Ok(())
}
