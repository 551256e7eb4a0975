//! TOML file configuration structures.
//!
//! These structs directly map to the `oracle-config.toml` file format.

use oracle_core::processors::DEFAULT_MAX_CONCURRENCY;
use oracle_core::store::DEFAULT_RETRY_TIMEOUT;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub queue: QueueConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Bridge gateway contracts and the nodes that build and broadcast for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base58check address of the main-chain gateway contract.
    pub main_chain_gateway: String,
    /// Base58check address of the side-chain gateway contract.
    pub side_chain_gateway: String,
    pub main_chain_endpoint: Url,
    pub side_chain_endpoint: Url,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// SQLite database at `DATABASE_URL`.
    #[default]
    Sqlite,
    /// Process memory; state is lost on restart.
    Memory,
}

/// Nonce status store section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Seconds a PROCESSING nonce is protected from re-dispatch.
    #[serde(default = "default_retry_timeout_secs")]
    pub retry_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            retry_timeout_secs: default_retry_timeout_secs(),
        }
    }
}

fn default_retry_timeout_secs() -> u64 {
    DEFAULT_RETRY_TIMEOUT.as_secs()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Largest batch one pull returns.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Events buffered per chain before publishers wait.
    #[serde(default = "default_buffer")]
    pub buffer: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            buffer: default_buffer(),
        }
    }
}

fn default_batch_size() -> usize {
    100
}

fn default_buffer() -> usize {
    1024
}
