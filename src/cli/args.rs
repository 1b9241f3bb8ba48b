//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    board::BoardArgs,
    completions::CompletionsArgs,
    config::ConfigCommands,
    mechanics::MechanicsCommands,
    open::OpenArgs,
    parts::PartsCommands,
    session::LoginArgs,
    units::UnitsCommands,
    wo::WoCommands,
};

#[derive(Parser)]
#[command(name = "shop")]
#[command(author, version, about = "Work order desk for a vehicle maintenance shop")]
#[command(long_about = "Track work orders through pending, in progress, on hold and completed, \
and browse units, mechanics, notes, parts and timelines from the shop API.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Base URL of the shop API (overrides SHOP_API_URL and config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token for this invocation (overrides the stored session)
    #[arg(long, global = true, env = "SHOP_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Mechanic id to act as (overrides SHOP_MECHANIC_ID and config)
    #[arg(long, short = 'm', global = true)]
    pub mechanic: Option<i64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open a page by path (/, /owner, /owner/units, /dispatch, /mechanic, /work-orders)
    Open(OpenArgs),

    /// Work order management
    #[command(subcommand)]
    Wo(WoCommands),

    /// Fleet units (trucks and reefers)
    #[command(subcommand)]
    Units(UnitsCommands),

    /// Shop mechanics
    #[command(subcommand)]
    Mechanics(MechanicsCommands),

    /// Parts catalog search
    #[command(subcommand)]
    Parts(PartsCommands),

    /// Interactive work order board
    Board(BoardArgs),

    /// Store an API token for later commands
    Login(LoginArgs),

    /// Remove the stored API token
    Logout,

    /// Show the active API URL, session and mechanic
    Whoami,

    /// View and modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (table for lists, card for show)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-aligned table (for terminals and piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <OutputFormat as ValueEnum>::from_str(s, true)
            .map_err(|_| format!("Invalid format: {}. Use tsv, json, yaml, csv, md or id", s))
    }
}
