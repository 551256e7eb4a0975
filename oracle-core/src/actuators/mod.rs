//! Actuators: per-event-type handlers that turn a decoded gateway event into a
//! pending transaction on the counterpart chain.
//!
//! The engine only ever talks to `dyn Actuator`; the concrete type is chosen
//! by the [`ActuatorFactory`](crate::factory::ActuatorFactory) from a raw
//! contract event, or by [`from_envelope`] when replaying a stored event.

mod mainchain;
mod sidechain;

pub use mainchain::{DepositTrc10Actuator, DepositTrc20Actuator, DepositTrc721Actuator, DepositTrxActuator};
pub use sidechain::{
    WithdrawTrc10Actuator, WithdrawTrc20Actuator, WithdrawTrc721Actuator, WithdrawTrxActuator,
};

use crate::gateway::{ChainGatewayApi, GatewayError};
use async_trait::async_trait;
use oracle_sdk::decode::DecodeError;
use oracle_sdk::objects::{EnvelopeError, EventEnvelope, EventType, TransactionTask};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActuatorError {
    /// An explicit field was malformed.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// An envelope payload did not match its declared type.
    #[error("deserialization error: {0}")]
    Deserialization(#[from] EnvelopeError),

    /// The chain gateway could not be reached while building the transaction.
    #[error("remote connect error: {0}")]
    RemoteConnect(String),

    /// The chain gateway refused to build or broadcast the transaction.
    #[error("remote rejected: {0}")]
    Rejected(String),
}

impl From<GatewayError> for ActuatorError {
    fn from(value: GatewayError) -> Self {
        match value {
            GatewayError::Connect(msg) => ActuatorError::RemoteConnect(msg),
            GatewayError::Rejected(msg) => ActuatorError::Rejected(msg),
        }
    }
}

/// Capability set shared by every event type.
#[async_trait]
pub trait Actuator: Send + Sync + std::fmt::Debug {
    /// Type tag of the wrapped event, fixed at construction.
    fn event_type(&self) -> EventType;

    /// Dedup key under which processing state is stored. Always present.
    fn key(&self) -> &[u8];

    /// Human-readable nonce for logs and lookups.
    ///
    /// `None` for event types whose key is not textual (main-chain deposits
    /// carry a raw byte nonce).
    fn nonce(&self) -> Option<String>;

    /// Re-pack the wrapped event for persistence or re-publishing.
    fn to_envelope(&self) -> Result<EventEnvelope, ActuatorError>;

    /// Build the counterpart transaction.
    ///
    /// The gateway is called at most once per actuator: later calls return
    /// the cached task. A connect error is returned as-is and nothing is
    /// cached, so the next caller tries again.
    async fn create_transaction_task(
        &mut self,
        api: &dyn ChainGatewayApi,
    ) -> Result<TransactionTask, ActuatorError>;

    /// Nonce for log lines, falling back to the hex key.
    fn display_nonce(&self) -> String {
        self.nonce().unwrap_or_else(|| hex::encode(self.key()))
    }
}

/// Rebuild an actuator from a stored or re-published envelope.
pub fn from_envelope(envelope: &EventEnvelope) -> Result<Box<dyn Actuator>, ActuatorError> {
    let actuator: Box<dyn Actuator> = match envelope.event_type {
        EventType::DepositTrx => Box::new(DepositTrxActuator::from_envelope(envelope)?),
        EventType::DepositTrc10 => Box::new(DepositTrc10Actuator::from_envelope(envelope)?),
        EventType::DepositTrc20 => Box::new(DepositTrc20Actuator::from_envelope(envelope)?),
        EventType::DepositTrc721 => Box::new(DepositTrc721Actuator::from_envelope(envelope)?),
        EventType::WithdrawTrx => Box::new(WithdrawTrxActuator::from_envelope(envelope)?),
        EventType::WithdrawTrc10 => Box::new(WithdrawTrc10Actuator::from_envelope(envelope)?),
        EventType::WithdrawTrc20 => Box::new(WithdrawTrc20Actuator::from_envelope(envelope)?),
        EventType::WithdrawTrc721 => Box::new(WithdrawTrc721Actuator::from_envelope(envelope)?),
    };
    Ok(actuator)
}

/// Store `task` in the actuator's cache slot and hand back a copy.
fn remember(slot: &mut Option<TransactionTask>, task: TransactionTask) -> TransactionTask {
    *slot = Some(task.clone());
    task
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeGateway, address};

    #[test]
    fn test_round_trip_keeps_key_and_nonce() {
        let actuators: Vec<Box<dyn Actuator>> = vec![
            Box::new(DepositTrxActuator::new(&address(1), "100", "0x1").unwrap()),
            Box::new(DepositTrc10Actuator::new(&address(1), "1000001", "5", "0x2").unwrap()),
            Box::new(
                DepositTrc20Actuator::new(&address(1), &address(2), "7", "0a").unwrap(),
            ),
            Box::new(
                DepositTrc721Actuator::new(&address(1), &address(2), "9", "0x0b").unwrap(),
            ),
            Box::new(WithdrawTrxActuator::new("11", &address(3), "1", "beef").unwrap()),
            Box::new(
                WithdrawTrc10Actuator::new("12", &address(3), "1000001", "2", "beef").unwrap(),
            ),
            Box::new(
                WithdrawTrc20Actuator::new("13", &address(3), "3", &address(4), "0xbeef")
                    .unwrap(),
            ),
            Box::new(
                WithdrawTrc721Actuator::new("14", &address(3), "4", &address(4), "beef")
                    .unwrap(),
            ),
        ];

        for actuator in actuators {
            let envelope = actuator.to_envelope().unwrap();
            assert_eq!(envelope.event_type, actuator.event_type());
            let rebuilt = from_envelope(&envelope).unwrap();
            assert_eq!(rebuilt.event_type(), actuator.event_type());
            assert_eq!(rebuilt.key(), actuator.key());
            assert_eq!(rebuilt.nonce(), actuator.nonce());
        }
    }

    #[test]
    fn test_from_envelope_rejects_mismatched_payload() {
        let withdraw = WithdrawTrxActuator::new("11", &address(3), "1", "beef").unwrap();
        let mut envelope = withdraw.to_envelope().unwrap();
        envelope.event_type = EventType::DepositTrc721;
        assert!(matches!(
            from_envelope(&envelope),
            Err(ActuatorError::Deserialization(_))
        ));
    }

    #[tokio::test]
    async fn test_transaction_task_is_built_once() {
        let gateway = FakeGateway::new();
        let mut actuator = DepositTrxActuator::new(&address(1), "100", "0x1").unwrap();

        let first = actuator.create_transaction_task(&gateway).await.unwrap();
        let second = actuator.create_transaction_task(&gateway).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(gateway.build_calls(), vec!["mint_trx".to_string()]);
    }

    #[tokio::test]
    async fn test_connect_error_is_not_cached() {
        let gateway = FakeGateway::new();
        gateway.fail_builds_with(GatewayError::Connect("node down".to_string()));
        let mut actuator = WithdrawTrxActuator::new("11", &address(3), "1", "beef").unwrap();

        let err = actuator.create_transaction_task(&gateway).await.unwrap_err();
        assert!(matches!(err, ActuatorError::RemoteConnect(_)));

        gateway.clear_failures();
        let task = actuator.create_transaction_task(&gateway).await.unwrap();
        assert_eq!(task.nonce, "11");
        assert_eq!(gateway.build_calls().len(), 2);
    }

    #[test]
    fn test_display_nonce_falls_back_to_key() {
        let deposit = DepositTrxActuator::new(&address(1), "100", "0x1").unwrap();
        assert_eq!(deposit.nonce(), None);
        assert_eq!(deposit.display_nonce(), "01");

        let withdraw = WithdrawTrxActuator::new("11", &address(3), "1", "beef").unwrap();
        assert_eq!(withdraw.display_nonce(), "11");
    }
}
