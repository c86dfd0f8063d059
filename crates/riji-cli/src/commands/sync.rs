use crate::commands::common::open_service;
use crate::error::CliError;

pub async fn run_sync(api_base: &str) -> Result<(), CliError> {
    let mut service = open_service(api_base)?;
    let stats = service.sync().await?;
    println!(
        "Synced {} entries ({} yours, {} from your partner)",
        stats.own + stats.paired,
        stats.own,
        stats.paired
    );
    Ok(())
}
