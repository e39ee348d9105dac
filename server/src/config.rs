use anyhow::{bail, Context};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ServerConfig {
    pub port: u16,
    /// Upper bound on the time spent serving one request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    pub postgres: PostgresConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct PostgresConfig {
    pub uri: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout_secs() -> u64 {
    5
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl PostgresConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Loads the config from the `CONFIG` (inline toml) or `CONFIG_PATH` (toml
/// file) environment variable. Exactly one of them must be set.
pub fn load_config() -> anyhow::Result<ServerConfig> {
    load_config_from(
        std::env::var("CONFIG_PATH").ok(),
        std::env::var("CONFIG").ok(),
    )
}

fn load_config_from(
    config_path: Option<String>,
    config: Option<String>,
) -> anyhow::Result<ServerConfig> {
    let config_str = match (config_path, config) {
        (None, Some(config)) => config,
        (Some(config_path), None) => std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed reading config file {}", config_path))?,
        (Some(_), Some(_)) => {
            bail!("only one of CONFIG and CONFIG_PATH environment variables should be specified")
        }
        (None, None) => {
            bail!("either CONFIG or CONFIG_PATH environment variable should be specified")
        }
    };

    toml::from_str::<ServerConfig>(&config_str).context("failed parsing config")
}
