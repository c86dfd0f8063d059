use riji_core::api::normalize_base_url;

use crate::config::{CliConfig, DEFAULT_API_BASE};
use crate::error::CliError;

pub fn run_config(api_base: Option<&str>) -> Result<(), CliError> {
    if let Some(raw) = api_base {
        let normalized =
            normalize_base_url(raw).map_err(|error| CliError::Config(error.to_string()))?;
        let mut config = CliConfig::load()?;
        config.api_base_url = Some(normalized);
        let path = config.save()?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = CliConfig::load()?;
    match config.api_base_url {
        Some(url) => println!("api_base_url = {url}"),
        None => println!("api_base_url = {DEFAULT_API_BASE} (default)"),
    }
    Ok(())
}
