//! Configuration management for Specbridge

use crate::error::{BridgeError, Result};

use serde::{Deserialize, Serialize};
use std::path::Path;

// Default functions for serde
fn default_host() -> String {
    crate::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    crate::DEFAULT_PORT
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Document fetch configuration
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Upstream document retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Timeout for fetching URL-form documents, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            fetch: FetchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration: file (when present), then environment
    /// overrides, then CLI overrides, then validation.
    pub fn load(
        path: Option<&Path>,
        host_override: Option<String>,
        port_override: Option<u16>,
    ) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path)?;
                serde_yaml::from_str(&content)?
            }
            _ => Config::default(),
        };

        config.apply_env_overrides();

        if let Some(host) = host_override {
            config.server.host = host;
        }
        if let Some(port) = port_override {
            config.server.port = port;
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply `SPECBRIDGE_*` environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SPECBRIDGE_HOST") {
            if !host.is_empty() {
                self.server.host = host;
            }
        }
        if let Ok(port) = std::env::var("SPECBRIDGE_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(timeout) = std::env::var("SPECBRIDGE_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout.parse() {
                self.fetch.timeout_secs = timeout;
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            return Err(BridgeError::invalid_input("server host cannot be empty"));
        }
        if self.server.port == 0 {
            return Err(BridgeError::invalid_input("server port cannot be 0"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(BridgeError::invalid_input("fetch timeout cannot be 0"));
        }
        Ok(())
    }
}
