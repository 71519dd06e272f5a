//! Postgres connection pool
//!
//! Every repository call borrows from one shared `PgPool`. A caller that
//! cannot get a connection within the acquire timeout receives
//! `sqlx::Error::PoolTimedOut`, which is passed through as a storage error.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Pool sizing and wait limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Idle connections above this count are closed after `idle_timeout`
    pub min_connections: u32,
    pub idle_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
            min_connections: 0,
            idle_timeout: Duration::from_secs(600),
        }
    }
}

impl PoolSettings {
    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
    }
}

/// Connect with default settings.
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/songbook").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    connect(database_url, PoolSettings::default()).await
}

/// Connect with default settings except for the connection cap.
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    let settings = PoolSettings {
        max_connections,
        ..PoolSettings::default()
    };
    connect(database_url, settings).await
}

/// Connect and verify one connection can be opened.
pub async fn connect(database_url: &str, settings: PoolSettings) -> Result<PgPool, sqlx::Error> {
    tracing::debug!(
        max_connections = settings.max_connections,
        acquire_timeout_ms = settings.acquire_timeout.as_millis() as u64,
        "connecting to postgres"
    );

    settings.options().connect(database_url).await
}
