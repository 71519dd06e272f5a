//! Tracing setup for the songbook CLI
//!
//! Usage:
//!   songbook --debug serve            # Debug logging to console
//!   RUST_LOG=songbook_server=trace    # Fine-grained log control
//!
//! Environment variables:
//!   RUST_LOG                          # Log filter (overrides config and --debug)

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Enable debug logging (used when RUST_LOG is not set)
    pub debug: bool,
    /// Default filter directive, from `[logging] level`
    pub level: String,
    /// Emit one JSON object per event instead of compact text
    pub json: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: "info".to_string(),
            json: false,
        }
    }
}

impl TracingConfig {
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            if self.debug {
                EnvFilter::new("debug")
            } else {
                EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
            }
        })
    }
}

/// Initialize the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init(config: &TracingConfig) -> Result<()> {
    let filter = config.filter();

    if config.json {
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
            .map_err(|err| anyhow!(err));
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug) // Show targets in debug mode
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
