use serde::Serialize;

use crate::commands::common::{
    entry_to_list_item, format_entry_lines, month_key, month_title, open_service, parse_month,
    EntryListItem,
};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct MonthListItem {
    month: String,
    entries: Vec<EntryListItem>,
}

pub async fn run_list(month: Option<&str>, as_json: bool, api_base: &str) -> Result<(), CliError> {
    let only = match month {
        Some(raw) => {
            let (year, month) = parse_month(Some(raw))?;
            Some(month_key(year, month))
        }
        None => None,
    };

    let mut service = open_service(api_base)?;
    service.sync().await?;

    let groups: Vec<_> = service
        .journal()
        .grouped()
        .into_iter()
        .filter(|group| only.as_ref().is_none_or(|key| &group.month == key))
        .collect();

    if as_json {
        let json_items = groups
            .iter()
            .map(|group| MonthListItem {
                month: group.month.clone(),
                entries: group.entries.iter().map(entry_to_list_item).collect(),
            })
            .collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("No entries.");
        return Ok(());
    }

    for group in &groups {
        println!("{}", month_title(&group.month));
        for line in format_entry_lines(&group.entries) {
            println!("{line}");
        }
        println!();
    }
    Ok(())
}
