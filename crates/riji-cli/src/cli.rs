use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "riji")]
#[command(about = "Read and write your paired diary from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in to the diary service
    Login {
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
        /// Persist the session to the OS keychain
        #[arg(long)]
        remember: bool,
    },
    /// Show session status
    Status,
    /// Sign out and clear the stored session
    Logout,
    /// Fetch all entries and report what changed hands
    Sync,
    /// List entries grouped by month
    List {
        /// Restrict to one month (YYYY-MM)
        #[arg(long, value_name = "MONTH")]
        month: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render a month calendar with entry marks
    Calendar {
        /// Month to render (YYYY-MM); current month when omitted
        month: Option<String>,
    },
    /// Show one entry in full
    Show {
        /// Entry date (YYYY-MM-DD); today when omitted
        date: Option<String>,
        /// Prefer your partner's entry when both exist on the date
        #[arg(long)]
        paired: bool,
    },
    /// Write or overwrite your entry for a date
    #[command(alias = "new")]
    Write {
        /// Entry date (YYYY-MM-DD); today when omitted
        date: Option<String>,
        /// Entry title
        #[arg(long, value_name = "TITLE")]
        title: Option<String>,
        /// Mood label
        #[arg(long, value_name = "MOOD")]
        mood: Option<String>,
        /// Weather label
        #[arg(long, value_name = "WEATHER")]
        weather: Option<String>,
    },
    /// Delete your entry for a date
    Delete {
        /// Entry date (YYYY-MM-DD)
        date: String,
    },
    /// Show or update CLI configuration
    Config {
        /// Set the API base URL used by every command
        #[arg(long, value_name = "URL")]
        set_api_base: Option<String>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
