use crate::commands::common::{open_service, parse_date};
use crate::error::CliError;

pub async fn run_delete(date: &str, api_base: &str) -> Result<(), CliError> {
    let date = parse_date(Some(date))?;

    let mut service = open_service(api_base)?;
    service.sync().await?;
    service.select_date(date, None).await?;

    let removed = service.delete_selected().await?;
    println!("Deleted {} (id {})", removed.date, removed.id);
    Ok(())
}
