use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] riji_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No entry content provided")]
    EmptyContent,
    #[error("Invalid date '{0}'; expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid month '{0}'; expected YYYY-MM")]
    InvalidMonth(String),
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "Not signed in. Run `riji login --email <EMAIL> --password <PASSWORD> --remember` first."
    )]
    NotSignedIn,
}
