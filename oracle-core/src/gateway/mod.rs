//! Remote chain API used to build and broadcast counterpart transactions.
//!
//! Every build function takes the event fields re-encoded the way the node
//! expects them: base58check addresses, decimal amounts, hex signatures.

mod http;

pub use http::HttpGatewayApi;

use async_trait::async_trait;
use oracle_sdk::objects::{RawTransaction, TransactionTask};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The node could not be reached, timed out, or failed internally.
    /// Retried through the nonce timeout cycle.
    #[error("gateway unreachable: {0}")]
    Connect(String),

    /// The node refused the request. Not retryable as-is.
    #[error("gateway rejected request: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait ChainGatewayApi: Send + Sync {
    async fn mint_trx(
        &self,
        from: &str,
        value: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError>;

    async fn mint_trc10(
        &self,
        from: &str,
        token_id: &str,
        token_value: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError>;

    async fn mint_trc20(
        &self,
        from: &str,
        contract_address: &str,
        value: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError>;

    async fn mint_trc721(
        &self,
        from: &str,
        contract_address: &str,
        uid: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError>;

    async fn withdraw_trx(
        &self,
        from: &str,
        value: &str,
        user_sign: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError>;

    async fn withdraw_trc10(
        &self,
        from: &str,
        token_id: &str,
        token_value: &str,
        user_sign: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError>;

    async fn withdraw_trc20(
        &self,
        from: &str,
        main_chain_address: &str,
        value: &str,
        user_sign: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError>;

    async fn withdraw_trc721(
        &self,
        from: &str,
        main_chain_address: &str,
        token_id: &str,
        user_sign: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError>;

    /// Broadcast a built transaction on the chain named by `task.kind`.
    ///
    /// Returns the transaction id accepted by the node.
    async fn broadcast(&self, task: &TransactionTask) -> Result<String, GatewayError>;
}
