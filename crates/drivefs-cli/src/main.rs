//! DriveFS CLI - Command-line access to a OneDrive / SharePoint drive
//!
//! Provides commands for:
//! - Listing, reading and writing files
//! - Creating, copying, moving and deleting items
//! - Inspecting metadata and sharing URLs
//! - Opening resumable upload sessions
//! - Managing the cached access token and the configuration file

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use drivefs_core::config::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{
    completions::CompletionsCommand,
    config::ConfigCommand,
    files::{CatCommand, CopyCommand, MkdirCommand, MoveCommand, PutCommand, RemoveCommand},
    info::{ExistsCommand, StatCommand, UploadSessionCommand, UrlCommand},
    list::ListCommand,
    token::TokenCommand,
    AppContext,
};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "drivefs", version, about = "Filesystem access to OneDrive via Microsoft Graph")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List a directory
    Ls(ListCommand),
    /// Print a file to stdout
    Cat(CatCommand),
    /// Upload a local file (or stdin with `-`)
    Put(PutCommand),
    /// Delete a file or directory
    Rm(RemoveCommand),
    /// Create a directory
    Mkdir(MkdirCommand),
    /// Copy an item
    Cp(CopyCommand),
    /// Move an item (copy, then delete)
    Mv(MoveCommand),
    /// Show item metadata
    Stat(StatCommand),
    /// Check whether an item exists
    Exists(ExistsCommand),
    /// Print a shareable URL for an item
    Url(UrlCommand),
    /// Open a resumable upload session
    UploadSession(UploadSessionCommand),
    /// Access token commands
    #[command(subcommand)]
    Token(TokenCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);

    // -v wins over the configured level; RUST_LOG wins over both
    let level = match cli.verbose {
        0 => Config::load_or_default(&config_path).logging.level,
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let ctx = AppContext::new(config_path, format);

    match cli.command {
        Commands::Ls(cmd) => cmd.execute(&ctx).await,
        Commands::Cat(cmd) => cmd.execute(&ctx).await,
        Commands::Put(cmd) => cmd.execute(&ctx).await,
        Commands::Rm(cmd) => cmd.execute(&ctx).await,
        Commands::Mkdir(cmd) => cmd.execute(&ctx).await,
        Commands::Cp(cmd) => cmd.execute(&ctx).await,
        Commands::Mv(cmd) => cmd.execute(&ctx).await,
        Commands::Stat(cmd) => cmd.execute(&ctx).await,
        Commands::Exists(cmd) => cmd.execute(&ctx).await,
        Commands::Url(cmd) => cmd.execute(&ctx).await,
        Commands::UploadSession(cmd) => cmd.execute(&ctx).await,
        Commands::Token(cmd) => cmd.execute(&ctx).await,
        Commands::Config(cmd) => cmd.execute(&ctx).await,
        Commands::Completions(cmd) => cmd.execute(&ctx).await,
    }
}
