//! TOML configuration.
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:7340"
//!
//! [catalog]
//! path = "./data/catalog.toml"   # optional; built-in catalog when absent
//!
//! [logging]
//! level = "info"                 # RUST_LOG takes precedence
//! ```
//!
//! Every section is optional. [`load_config`] parses and validates a file;
//! [`Config::minimal`] is used when no file is present.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// Catalog file with `[[flights]]` and `[cities]`. `None` serves the
    /// built-in catalog.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl Config {
    /// Built-in catalog, default bind address, `info` logging.
    pub fn minimal() -> Self {
        Self::default()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    config
        .server
        .bind
        .parse::<SocketAddr>()
        .with_context(|| format!("server.bind is not a socket address: '{}'", config.server.bind))?;

    tracing_subscriber::EnvFilter::try_new(&config.logging.level)
        .with_context(|| format!("logging.level is not a valid filter: '{}'", config.logging.level))?;

    if let Some(path) = &config.catalog.path {
        if path.as_os_str().is_empty() {
            anyhow::bail!("catalog.path must not be empty");
        }
    }

    Ok(())
}
