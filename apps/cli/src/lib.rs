//! # totem-quote CLI
//!
//! Command-line front end for the totem rental quote engine.
//!
//! ## Startup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Startup Sequence                               │
//! │                                                                         │
//! │  1. Parse arguments (clap)                                              │
//! │  2. Initialize tracing (stderr, RUST_LOG aware)                         │
//! │  3. Load EngineConfig (file → TOTEM_* env → validate)                   │
//! │  4. Dispatch:                                                           │
//! │       quote      ──► inventory chain + geocoder + QuoteEngine           │
//! │       inventory  ──► inventory chain + catalog edits                    │
//! │       config     ──► render effective config                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Results go to stdout; logs and degradation warnings go to stderr so
//! `--json` output stays machine-readable.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use totem_engine::EngineConfig;

pub mod commands;

use commands::{config::ConfigCommand, inventory::InventoryCommand, quote::QuoteArgs};

/// Rental quotes for totems: daily rate plus dedicated or courier transport.
#[derive(Debug, Parser)]
#[command(name = "totem-quote", version, about)]
pub struct Cli {
    /// Config file (defaults to the per-user config directory)
    #[arg(long, global = true, env = "TOTEM_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute a quote with both transport options
    Quote(QuoteArgs),
    /// Inspect or edit the shared model inventory
    #[command(subcommand)]
    Inventory(InventoryCommand),
    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Parses the process arguments and runs the selected command.
pub async fn run() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    execute(cli).await
}

/// Runs an already-parsed command line.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    // `config path` must work even when the file it points at is broken
    if let Command::Config(ConfigCommand::Path) = cli.command {
        return commands::config::print_path(cli.config.as_deref());
    }

    let config = EngineConfig::load(cli.config)?;

    match cli.command {
        Command::Quote(args) => commands::quote::run(&config, args).await,
        Command::Inventory(cmd) => commands::inventory::run(&config, cmd).await,
        Command::Config(cmd) => commands::config::run(&config, cmd),
    }
}

/// Initializes the tracing subscriber.
///
/// Writes to stderr; `RUST_LOG` takes precedence over the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,totem=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .with_writer(std::io::stderr)
        .init();
}
