//! songbook - song catalog service
//!
//! Entry point for the `songbook` binary:
//! - `serve`: HTTP API over the Postgres song catalog
//! - `migrate`: create the schema and exit
//! - `config`: inspect or initialize the configuration file

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use config::SongbookConfig;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "songbook",
    author,
    version,
    about = "Song catalog service backed by Postgres",
    long_about = "Store songs with their group, release date, lyrics and link. Lyrics can be \
                  read verse by verse; deleted songs are kept as soft-deleted rows."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ~/.songbook/config.toml)
    #[arg(long, short = 'c', global = true, env = "SONGBOOK_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create tables and indexes, then exit
    Migrate(commands::migrate::MigrateArgs),
    /// Inspect or initialize configuration (show, path, init)
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    // `config init` creates the file, so it must not require one to exist
    let config = match &cli.command {
        Commands::Config(config::ConfigArgs {
            command: config::ConfigCommands::Init(_),
        }) => SongbookConfig::default(),
        _ => SongbookConfig::load(cli.config.as_deref())?,
    };

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        level: config.logging.level.clone(),
        json: config.logging.json,
    })
    .ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, &config).await?,
        Commands::Migrate(args) => commands::run_migrate(args, &config).await?,
        Commands::Config(args) => config::run_config(args, &config, cli.config.as_deref())?,
    }
    Ok(())
}
