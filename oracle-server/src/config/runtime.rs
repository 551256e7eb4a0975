//! Validated configuration used at runtime.

use super::file::StoreBackend;
use oracle_sdk::address::TronAddress;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub listen: SocketAddr,
    pub gateway: GatewayConfig,
    pub store_backend: StoreBackend,
    pub retry_timeout: Duration,
    pub max_concurrency: usize,
    pub batch_size: usize,
    pub queue_buffer: usize,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub main_chain_gateway: TronAddress,
    pub side_chain_gateway: TronAddress,
    pub main_chain_endpoint: Url,
    pub side_chain_endpoint: Url,
    pub request_timeout: Duration,
}
