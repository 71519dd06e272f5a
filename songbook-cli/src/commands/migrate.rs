//! `songbook migrate`: create tables and indexes, then exit

use anyhow::{Context, Result};
use clap::Parser;

use songbook_server::db::{create_pool, migrations};

use crate::config::SongbookConfig;

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides [postgres] url)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

pub async fn run_migrate(args: MigrateArgs, config: &SongbookConfig) -> Result<()> {
    let database_url = args
        .database_url
        .or_else(|| config.postgres.url.clone())
        .context("Database URL not set. Set via --database-url, DATABASE_URL env, or [postgres] url")?;

    let pool = create_pool(&database_url)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    pool.close().await;
    println!("Schema is up to date");
    Ok(())
}
