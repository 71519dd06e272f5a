//! Configuration file and the `config` subcommand
//!
//! Resolution order, later wins:
//! 1. built-in defaults
//! 2. TOML file (`--config`, `SONGBOOK_CONFIG`, or `~/.songbook/config.toml`)
//! 3. environment / command-line flags (applied by each command)

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SongbookConfig {
    pub server: ServerSection,
    pub postgres: PostgresSection,
    pub music_service: MusicServiceSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: SocketAddr,
    pub cors_permissive: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            cors_permissive: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresSection {
    /// Connection string; usually left to `DATABASE_URL`
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for PostgresSection {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicServiceSection {
    pub address: String,
    pub timeout_secs: u64,
}

impl Default for MusicServiceSection {
    fn default() -> Self {
        Self {
            address: "http://localhost:8081".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl SongbookConfig {
    /// Default location: `~/.songbook/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".songbook/config.toml")
    }

    /// Load from `explicit` if given (must exist), otherwise from the
    /// default path, falling back to defaults when that file is absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid TOML")
    }

    /// Copy safe to print: the password in the Postgres URL is masked.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.postgres.url = config.postgres.url.as_deref().map(mask_password);
        config
    }
}

/// Replace the password of a connection URL with `****`.
///
/// Input that does not parse as a URL, or carries no password, is returned
/// unchanged.
pub fn mask_password(raw: &str) -> String {
    let Ok(mut parsed) = Url::parse(raw) else {
        return raw.to_string();
    };
    if parsed.password().is_none() || parsed.set_password(Some("****")).is_err() {
        return raw.to_string();
    }
    parsed.to_string()
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration (password masked)
    Show(ShowArgs),
    /// Show config file path
    Path,
    /// Write a config file with default values
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "toml")]
    pub format: ShowFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ShowFormat {
    Toml,
    Json,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs, config: &SongbookConfig, explicit: Option<&Path>) -> Result<()> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(SongbookConfig::default_path);

    match args.command {
        ConfigCommands::Show(args) => run_show(args, config),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommands::Init(args) => run_init(args, &path),
    }
}

fn run_show(args: ShowArgs, config: &SongbookConfig) -> Result<()> {
    let redacted = config.redacted();
    let rendered = match args.format {
        ShowFormat::Toml => {
            toml::to_string_pretty(&redacted).context("Failed to serialize config as TOML")?
        }
        ShowFormat::Json => {
            serde_json::to_string_pretty(&redacted).context("Failed to serialize config as JSON")?
        }
    };
    println!("{}", rendered);
    Ok(())
}

fn run_init(args: InitArgs, path: &Path) -> Result<()> {
    if path.exists() && !args.force {
        anyhow::bail!(
            "Config already exists at {}\n\nUse --force to overwrite",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(&SongbookConfig::default())
        .context("Failed to serialize default config")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    println!("Created config at: {}", path.display());
    Ok(())
}
