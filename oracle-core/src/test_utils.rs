//! Test doubles shared across the crate's unit tests.

use crate::actuators::Actuator;
use crate::gateway::{ChainGatewayApi, GatewayError};
use crate::submitter::{SubmitError, TransactionSubmitter};
use async_trait::async_trait;
use oracle_sdk::address::{ADDRESS_PREFIX, TronAddress};
use oracle_sdk::objects::{RawTransaction, TransactionTask};
use std::sync::Mutex;

/// Deterministic base58check address for a one-byte seed.
pub fn address(seed: u8) -> String {
    let mut bytes = [seed; 21];
    bytes[0] = ADDRESS_PREFIX;
    TronAddress::from_bytes(&bytes).unwrap().to_base58check()
}

/// Gateway that answers every build with a canned transaction and records
/// which functions were called.
#[derive(Default)]
pub struct FakeGateway {
    builds: Mutex<Vec<String>>,
    broadcasts: Mutex<Vec<TransactionTask>>,
    build_error: Mutex<Option<GatewayError>>,
    broadcast_error: Mutex<Option<GatewayError>>,
    user_sign: Mutex<Option<String>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_builds_with(&self, error: GatewayError) {
        *self.build_error.lock().unwrap() = Some(error);
    }

    pub fn fail_broadcasts_with(&self, error: GatewayError) {
        *self.broadcast_error.lock().unwrap() = Some(error);
    }

    pub fn clear_failures(&self) {
        *self.build_error.lock().unwrap() = None;
        *self.broadcast_error.lock().unwrap() = None;
    }

    pub fn build_calls(&self) -> Vec<String> {
        self.builds.lock().unwrap().clone()
    }

    pub fn broadcasts(&self) -> Vec<TransactionTask> {
        self.broadcasts.lock().unwrap().clone()
    }

    pub fn last_user_sign(&self) -> Option<String> {
        self.user_sign.lock().unwrap().clone()
    }

    fn build(
        &self,
        method: &str,
        nonce: &str,
        user_sign: Option<&str>,
    ) -> Result<RawTransaction, GatewayError> {
        self.builds.lock().unwrap().push(method.to_string());
        if let Some(sign) = user_sign {
            *self.user_sign.lock().unwrap() = Some(sign.to_string());
        }
        if let Some(err) = self.build_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(RawTransaction {
            tx_id: format!("{method}-{nonce}"),
            raw_data_hex: "0a00".to_string(),
        })
    }
}

#[async_trait]
impl ChainGatewayApi for FakeGateway {
    async fn mint_trx(&self, _: &str, _: &str, nonce: &str) -> Result<RawTransaction, GatewayError> {
        self.build("mint_trx", nonce, None)
    }

    async fn mint_trc10(
        &self,
        _: &str,
        _: &str,
        _: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError> {
        self.build("mint_trc10", nonce, None)
    }

    async fn mint_trc20(
        &self,
        _: &str,
        _: &str,
        _: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError> {
        self.build("mint_trc20", nonce, None)
    }

    async fn mint_trc721(
        &self,
        _: &str,
        _: &str,
        _: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError> {
        self.build("mint_trc721", nonce, None)
    }

    async fn withdraw_trx(
        &self,
        _: &str,
        _: &str,
        user_sign: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError> {
        self.build("withdraw_trx", nonce, Some(user_sign))
    }

    async fn withdraw_trc10(
        &self,
        _: &str,
        _: &str,
        _: &str,
        user_sign: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError> {
        self.build("withdraw_trc10", nonce, Some(user_sign))
    }

    async fn withdraw_trc20(
        &self,
        _: &str,
        _: &str,
        _: &str,
        user_sign: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError> {
        self.build("withdraw_trc20", nonce, Some(user_sign))
    }

    async fn withdraw_trc721(
        &self,
        _: &str,
        _: &str,
        _: &str,
        user_sign: &str,
        nonce: &str,
    ) -> Result<RawTransaction, GatewayError> {
        self.build("withdraw_trc721", nonce, Some(user_sign))
    }

    async fn broadcast(&self, task: &TransactionTask) -> Result<String, GatewayError> {
        self.broadcasts.lock().unwrap().push(task.clone());
        if let Some(err) = self.broadcast_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(task.transaction.tx_id.clone())
    }
}

/// Submitter that keeps every actuator it is handed.
#[derive(Default)]
pub struct RecordingSubmitter {
    submitted: Mutex<Vec<Box<dyn Actuator>>>,
    fail: Mutex<bool>,
}

impl RecordingSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_all(&self) {
        *self.fail.lock().unwrap() = true;
    }

    pub fn count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    /// Drain the submitted actuators.
    pub fn take(&self) -> Vec<Box<dyn Actuator>> {
        std::mem::take(&mut *self.submitted.lock().unwrap())
    }

    /// Display nonces of submitted actuators, in submission order.
    pub fn nonces(&self) -> Vec<String> {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.display_nonce())
            .collect()
    }
}

#[async_trait]
impl TransactionSubmitter for RecordingSubmitter {
    async fn submit(&self, actuator: Box<dyn Actuator>) -> Result<(), SubmitError> {
        if *self.fail.lock().unwrap() {
            return Err(SubmitError::Closed);
        }
        self.submitted.lock().unwrap().push(actuator);
        Ok(())
    }
}
