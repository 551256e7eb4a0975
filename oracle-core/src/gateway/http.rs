//! HTTP client for the gateway build and broadcast endpoints.
//!
//! Build calls go to the side-chain node (`POST /gateway/{method}` with the
//! event fields as a JSON object, answered with a raw transaction). Broadcast
//! goes to the node named by the task's kind (`POST /wallet/broadcasttransaction`).

use super::{ChainGatewayApi, GatewayError};
use async_trait::async_trait;
use oracle_sdk::objects::{RawTransaction, TaskKind, TransactionTask};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub struct HttpGatewayApi {
    main_chain: Url,
    side_chain: Url,
    http_client: reqwest::Client,
}

impl HttpGatewayApi {
    /// Create a new HttpGatewayApi.
    ///
    /// # Arguments
    ///
    /// * `main_chain` - Base URL of the main-chain node
    /// * `side_chain` - Base URL of the side-chain node
    /// * `timeout` - Per-request timeout
    pub fn new(main_chain: Url, side_chain: Url, timeout: Duration) -> Self {
        Self {
            main_chain,
            side_chain,
            http_client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    fn endpoint(&self, kind: TaskKind, path: &str) -> String {
        let base = match kind {
            TaskKind::MainChain => &self.main_chain,
            TaskKind::SideChain => &self.side_chain,
        };
        format!("{}/{}", base.as_str().trim_end_matches('/'), path)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        kind: TaskKind,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, GatewayError> {
        let url = self.endpoint(kind, path);
        debug!(%url, "Gateway request");

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Connect(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(GatewayError::Connect(format!("{url} answered {status}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected(format!("{url} answered {status}: {body}")));
        }

        // A body cut short is a transport failure; only a complete body that
        // does not parse counts as a rejection.
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Connect(format!("{url} body read failed: {e}")))?;
        serde_json::from_slice::<T>(&bytes)
            .map_err(|e| GatewayError::Rejected(format!("unexpected response from {url}: {e}")))
    }

    async fn build(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<RawTransaction, GatewayError> {
        self.post(TaskKind::SideChain, &format!("gateway/{method}"), body)
            .await
    }
}

#[derive(Debug, serde::Deserialize)]
struct BroadcastResponse {
    #[serde(default)]
    result: bool,
    #[serde(default)]
    txid: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[async_trait]
impl ChainGatewayApi for HttpGatewayApi {
    async fn mint_trx(
        &self,
        from: &str,
        value: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError> {
        self.build(
            "mint-trx",
            json!({ "from": from, "value": value, "nonce": nonce }),
        )
        .await
    }

    async fn mint_trc10(
        &self,
        from: &str,
        token_id: &str,
        token_value: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError> {
        self.build(
            "mint-trc10",
            json!({
                "from": from,
                "tokenId": token_id,
                "tokenValue": token_value,
                "nonce": nonce,
            }),
        )
        .await
    }

    async fn mint_trc20(
        &self,
        from: &str,
        contract_address: &str,
        value: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError> {
        self.build(
            "mint-trc20",
            json!({
                "from": from,
                "contractAddress": contract_address,
                "value": value,
                "nonce": nonce,
            }),
        )
        .await
    }

    async fn mint_trc721(
        &self,
        from: &str,
        contract_address: &str,
        uid: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError> {
        self.build(
            "mint-trc721",
            json!({
                "from": from,
                "contractAddress": contract_address,
                "uid": uid,
                "nonce": nonce,
            }),
        )
        .await
    }

    async fn withdraw_trx(
        &self,
        from: &str,
        value: &str,
        user_sign: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError> {
        self.build(
            "withdraw-trx",
            json!({
                "from": from,
                "value": value,
                "userSign": user_sign,
                "nonce": nonce,
            }),
        )
        .await
    }

    async fn withdraw_trc10(
        &self,
        from: &str,
        token_id: &str,
        token_value: &str,
        user_sign: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError> {
        self.build(
            "withdraw-trc10",
            json!({
                "from": from,
                "tokenId": token_id,
                "tokenValue": token_value,
                "userSign": user_sign,
                "nonce": nonce,
            }),
        )
        .await
    }

    async fn withdraw_trc20(
        &self,
        from: &str,
        main_chain_address: &str,
        value: &str,
        user_sign: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError> {
        self.build(
            "withdraw-trc20",
            json!({
                "from": from,
                "mainChainAddress": main_chain_address,
                "value": value,
                "userSign": user_sign,
                "nonce": nonce,
            }),
        )
        .await
    }

    async fn withdraw_trc721(
        &self,
        from: &str,
        main_chain_address: &str,
        token_id: &str,
        user_sign: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError> {
        self.build(
            "withdraw-trc721",
            json!({
                "from": from,
                "mainChainAddress": main_chain_address,
                "tokenId": token_id,
                "userSign": user_sign,
                "nonce": nonce,
            }),
        )
        .await
    }

    async fn broadcast(&self, task: &TransactionTask) -> Result<String, GatewayError> {
        let response: BroadcastResponse = self
            .post(
                task.kind,
                "wallet/broadcasttransaction",
                json!({
                    "txID": task.transaction.tx_id,
                    "raw_data_hex": task.transaction.raw_data_hex,
                }),
            )
            .await?;

        if response.result {
            Ok(response.txid.unwrap_or_else(|| task.transaction.tx_id.clone()))
        } else {
            Err(GatewayError::Rejected(format!(
                "{}: {}",
                response.code.as_deref().unwrap_or("UNKNOWN"),
                response.message.as_deref().unwrap_or("no message"),
            )))
        }
    }
}
