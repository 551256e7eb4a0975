//! Configuration module for oracle-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables.

pub mod file;
pub mod runtime;

use crate::config::file::FileConfig;
use crate::config::runtime::{GatewayConfig, RuntimeConfig};
use oracle_sdk::address::TronAddress;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Read the TOML file, apply CLI overrides and validate.
    pub fn load(&self) -> Result<RuntimeConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        self.load_str(&config_content)
    }

    fn load_str(&self, config_content: &str) -> Result<RuntimeConfig, ConfigError> {
        let mut file_config: FileConfig = toml::from_str(config_content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        validate(file_config)
    }
}

fn validate(config: FileConfig) -> Result<RuntimeConfig, ConfigError> {
    let main_chain_gateway = gateway_address("main_chain_gateway", &config.gateway.main_chain_gateway)?;
    let side_chain_gateway = gateway_address("side_chain_gateway", &config.gateway.side_chain_gateway)?;
    if main_chain_gateway == side_chain_gateway {
        return Err(ConfigError::ValidationError(
            "main_chain_gateway and side_chain_gateway must differ".to_string(),
        ));
    }

    positive("gateway.request_timeout_secs", config.gateway.request_timeout_secs as usize)?;
    positive("store.retry_timeout_secs", config.store.retry_timeout_secs as usize)?;
    positive("worker.max_concurrency", config.worker.max_concurrency)?;
    positive("queue.batch_size", config.queue.batch_size)?;
    positive("queue.buffer", config.queue.buffer)?;

    Ok(RuntimeConfig {
        listen: config.server.listen,
        gateway: GatewayConfig {
            main_chain_gateway,
            side_chain_gateway,
            main_chain_endpoint: config.gateway.main_chain_endpoint,
            side_chain_endpoint: config.gateway.side_chain_endpoint,
            request_timeout: Duration::from_secs(config.gateway.request_timeout_secs),
        },
        store_backend: config.store.backend,
        retry_timeout: Duration::from_secs(config.store.retry_timeout_secs),
        max_concurrency: config.worker.max_concurrency,
        batch_size: config.queue.batch_size,
        queue_buffer: config.queue.buffer,
    })
}

fn gateway_address(name: &str, value: &str) -> Result<TronAddress, ConfigError> {
    TronAddress::from_base58check(value)
        .map_err(|e| ConfigError::ValidationError(format!("{name} is not a valid address: {e}")))
}

fn positive(name: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ValidationError(format!(
            "{name} must be greater than zero"
        )));
    }
    Ok(())
}

/// Get the database URL from the environment.
pub fn get_database_url() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)
}
