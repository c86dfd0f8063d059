//! Persistent CLI configuration.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CliError;

pub const DEFAULT_API_BASE: &str = "https://nideriji.cn";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default)]
    pub api_base_url: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("riji")
        .join(CONFIG_FILE_NAME)
}

impl CliConfig {
    pub fn load() -> Result<Self, CliError> {
        Self::load_from_path(&default_config_path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            CliError::Config(format!("Failed to read config at {}: {}", path.display(), error))
        })?;
        serde_json::from_str(&raw).map_err(|error| {
            CliError::Config(format!(
                "Failed to parse config at {}: {}",
                path.display(),
                error
            ))
        })
    }

    pub fn save(&self) -> Result<PathBuf, CliError> {
        let path = default_config_path();
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), CliError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                CliError::Config(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                ))
            })?;
        }

        let serialized = serde_json::to_string_pretty(self)
            .map_err(|error| CliError::Config(format!("Failed to serialize config: {error}")))?;
        std::fs::write(path, serialized).map_err(|error| {
            CliError::Config(format!(
                "Failed to write config at {}: {}",
                path.display(),
                error
            ))
        })
    }
}

/// Flag → `RIJI_API_BASE` env → config file → built-in default.
pub fn resolve_api_base(flag: Option<&str>) -> Result<String, CliError> {
    if let Some(url) = normalize_text(flag) {
        return Ok(url);
    }
    if let Some(url) = normalize_text(env::var("RIJI_API_BASE").ok().as_deref()) {
        return Ok(url);
    }

    let config = CliConfig::load()?;
    if let Some(url) = normalize_text(config.api_base_url.as_deref()) {
        return Ok(url);
    }
    Ok(DEFAULT_API_BASE.to_string())
}

fn normalize_text(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
