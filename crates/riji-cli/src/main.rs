//! riji CLI - command-line client for a paired personal diary
//!
//! Read, write, and browse dated entries, yours and your partner's,
//! against the remote diary service.

mod cli;
mod commands;
mod config;
mod error;
mod session_store;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("riji=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let api_base = config::resolve_api_base(cli.api_base.as_deref())?;

    match cli.command {
        Commands::Login {
            email,
            password,
            remember,
        } => commands::auth_cmd::run_login(&email, &password, remember, &api_base).await,
        Commands::Status => commands::auth_cmd::run_status(),
        Commands::Logout => commands::auth_cmd::run_logout(),
        Commands::Sync => commands::sync::run_sync(&api_base).await,
        Commands::List { month, json } => {
            commands::list::run_list(month.as_deref(), json, &api_base).await
        }
        Commands::Calendar { month } => {
            commands::calendar::run_calendar(month.as_deref(), &api_base).await
        }
        Commands::Show { date, paired } => {
            commands::show::run_show(date.as_deref(), paired, &api_base).await
        }
        Commands::Write {
            date,
            title,
            mood,
            weather,
        } => commands::write::run_write(date.as_deref(), title, mood, weather, &api_base).await,
        Commands::Delete { date } => commands::delete::run_delete(&date, &api_base).await,
        Commands::Config { set_api_base } => commands::config::run_config(set_api_base.as_deref()),
        Commands::Completions { shell, output } => {
            commands::completions::run_completions(shell, output.as_deref())
        }
    }
}
