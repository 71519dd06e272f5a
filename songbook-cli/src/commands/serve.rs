//! `songbook serve`: run the HTTP API
//!
//! Connects to Postgres, applies the schema, then serves until Ctrl+C/SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use songbook_server::client::MusicInfoClient;
use songbook_server::db::{create_pool_with_options, migrations, SongRepo};
use songbook_server::http::{run_server, AppState, ServerConfig};

use crate::config::SongbookConfig;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides [server] bind)
    #[arg(long, short = 'b', env = "SONGBOOK_BIND")]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides [postgres] url)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Music metadata service base URL (overrides [music_service] address)
    #[arg(long, env = "MUSIC_SERVICE_ADDRESS")]
    pub music_service: Option<String>,

    /// Do not create tables and indexes on startup
    #[arg(long)]
    pub skip_migrations: bool,
}

impl ServeArgs {
    /// Fold flags and environment into the file configuration.
    fn apply(&self, config: &SongbookConfig) -> SongbookConfig {
        let mut merged = config.clone();
        if let Some(bind) = self.bind {
            merged.server.bind = bind;
        }
        if self.cors_permissive {
            merged.server.cors_permissive = true;
        }
        if let Some(url) = &self.database_url {
            merged.postgres.url = Some(url.clone());
        }
        if let Some(max) = self.max_connections {
            merged.postgres.max_connections = max;
        }
        if let Some(address) = &self.music_service {
            merged.music_service.address = address.clone();
        }
        merged
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config: &SongbookConfig) -> Result<()> {
    let config = args.apply(config);

    let database_url = config
        .postgres
        .url
        .as_deref()
        .context("Database URL not set. Set via --database-url, DATABASE_URL env, or [postgres] url")?;

    tracing::info!(
        bind = %config.server.bind,
        music_service = %config.music_service.address,
        "Starting songbook server"
    );

    let pool = create_pool_with_options(database_url, config.postgres.max_connections)
        .await
        .context("Failed to create database pool")?;

    if args.skip_migrations {
        tracing::debug!("skipping migrations");
    } else {
        migrations::run(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    let music_info = MusicInfoClient::new(
        config.music_service.address.clone(),
        Duration::from_secs(config.music_service.timeout_secs),
    )
    .context("Failed to build music service client")?;

    let state = AppState::new(Arc::new(SongRepo::new(pool)), Arc::new(music_info));

    let server_config = ServerConfig {
        bind_addr: config.server.bind,
        cors_permissive: config.server.cors_permissive,
    };

    // Run server (blocks until shutdown)
    run_server(state, server_config)
        .await
        .context("Server error")?;

    Ok(())
}
