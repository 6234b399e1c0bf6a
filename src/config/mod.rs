use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::chain::tx::DEFAULT_GAS;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub quasar_rest: String,
    pub osmosis_rest: String,
    pub chain_id: String,
    pub request_timeout_secs: u64,
    pub block_poll_ms: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            quasar_rest: "http://localhost:1317".to_string(),
            osmosis_rest: "http://localhost:1318".to_string(),
            chain_id: "quasar-1".to_string(),
            request_timeout_secs: 10,
            block_poll_ms: 1000,
        }
    }
}

impl ChainConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn block_poll(&self) -> Duration {
        Duration::from_millis(self.block_poll_ms.max(100))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Vault contract address on the Quasar chain
    pub vault: Option<String>,
    pub poll_interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            vault: None,
            poll_interval_secs: 5,
        }
    }
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn vault_address(&self) -> Option<&str> {
        self.vault
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TxConfig {
    pub gas: String,
    pub memo: String,
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            gas: DEFAULT_GAS.to_string(),
            memo: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: Option<PathBuf>,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chain: ChainConfig,

    #[serde(default)]
    pub monitor: MonitorConfig,

    #[serde(default)]
    pub tx: TxConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str::<Config>(content).context("parse config")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::parse(&content)
    }
}

/// Load the config from the standard location, falling back to defaults
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    load_from(&path)
}

/// Load the config at `path`; a missing or invalid file yields defaults
pub fn load_from(path: &Path) -> Config {
    match Config::from_path(path) {
        Ok(config) => config,
        Err(err) => {
            if path.exists() {
                tracing::warn!(path = %path.display(), "{:#}", err);
            }
            Config::default()
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("QMONITOR_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("qmonitor").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("qmonitor").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "qmonitor", "qmonitor")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("qmonitor"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("qmonitor"));
    }
    directories::ProjectDirs::from("io", "qmonitor", "qmonitor")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn log_dir(config: &LoggingConfig) -> Option<PathBuf> {
    config
        .directory
        .clone()
        .or_else(|| data_dir().map(|dir| dir.join("logs")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.chain.quasar_rest, "http://localhost:1317");
        assert_eq!(config.chain.chain_id, "quasar-1");
        assert_eq!(config.monitor.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.tx.gas, "200000");
        assert!(config.monitor.vault_address().is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
            [chain]
            quasar_rest = "https://lcd.quasar.example"

            [monitor]
            vault = " quasar1vault "
            poll_interval_secs = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.chain.quasar_rest, "https://lcd.quasar.example");
        assert_eq!(config.chain.osmosis_rest, "http://localhost:1318");
        assert_eq!(config.monitor.vault_address(), Some("quasar1vault"));
        // zero is clamped
        assert_eq!(config.monitor.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(Config::parse("[chain\nquasar_rest = 1").is_err());
        assert!(Config::parse("[chain]\nrequest_timeout_secs = \"ten\"").is_err());
    }
}
