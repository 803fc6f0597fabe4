//! Configuration loading.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// TCP listener for the line transport.
    #[serde(default)]
    pub server: ServerConfig,
    /// REST gateway listener.
    #[serde(default)]
    pub api: ApiConfig,
    /// Where published message lines are appended.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Bind address in `host:port` form.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_api_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_api_port() -> u16 {
    3000
}

fn default_log_file() -> PathBuf {
    PathBuf::from("messages.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_config() {
        let config: Config = toml::from_str(
            r#"
            log_file = "logs/chat.log"

            [server]
            host = "127.0.0.1"
            port = 9000

            [api]
            port = 9001
            "#,
        )
        .expect("parse config");

        assert_eq!(config.server.addr(), "127.0.0.1:9000");
        assert_eq!(config.api.port, 9001);
        assert_eq!(config.log_file, PathBuf::from("logs/chat.log"));
    }

    #[test]
    fn empty_config_falls_back_to_defaults() {
        let config: Config = toml::from_str("").expect("parse empty config");

        assert_eq!(config.server.addr(), "0.0.0.0:8000");
        assert_eq!(config.api.port, 3000);
        assert_eq!(config.log_file, PathBuf::from("messages.log"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
