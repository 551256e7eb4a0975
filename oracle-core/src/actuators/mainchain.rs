//! Deposit actuators: events from the main-chain gateway that mint on the
//! side chain.
//!
//! The dedup key is the raw nonce bytes. The gateway receives the nonce as hex.

use super::{Actuator, ActuatorError, remember};
use crate::gateway::ChainGatewayApi;
use async_trait::async_trait;
use oracle_sdk::objects::{
    DepositTrc10Event, DepositTrc20Event, DepositTrc721Event, DepositTrxEvent, EventEnvelope,
    EventType, TaskKind, TransactionTask,
};
use tracing::info;

#[derive(Debug)]
pub struct DepositTrxActuator {
    event: DepositTrxEvent,
    task: Option<TransactionTask>,
}

impl DepositTrxActuator {
    pub fn new(from: &str, value: &str, nonce: &str) -> Result<Self, ActuatorError> {
        Ok(Self::with_event(DepositTrxEvent::decode(from, value, nonce)?))
    }

    pub fn from_envelope(envelope: &EventEnvelope) -> Result<Self, ActuatorError> {
        Ok(Self::with_event(envelope.unpack()?))
    }

    fn with_event(event: DepositTrxEvent) -> Self {
        Self { event, task: None }
    }
}

#[async_trait]
impl Actuator for DepositTrxActuator {
    fn event_type(&self) -> EventType {
        EventType::DepositTrx
    }

    fn key(&self) -> &[u8] {
        &self.event.nonce
    }

    fn nonce(&self) -> Option<String> {
        None
    }

    fn to_envelope(&self) -> Result<EventEnvelope, ActuatorError> {
        Ok(EventEnvelope::pack(&self.event)?)
    }

    async fn create_transaction_task(
        &mut self,
        api: &dyn ChainGatewayApi,
    ) -> Result<TransactionTask, ActuatorError> {
        if let Some(task) = &self.task {
            return Ok(task.clone());
        }
        let from = self.event.from.to_base58check();
        let nonce = hex::encode(&self.event.nonce);
        info!(
            %from,
            value = %self.event.value,
            %nonce,
            "Building TRX deposit mint"
        );
        let transaction = api.mint_trx(&from, &self.event.value, &nonce).await?;
        Ok(remember(
            &mut self.task,
            TransactionTask {
                kind: TaskKind::SideChain,
                nonce,
                transaction,
            },
        ))
    }
}

#[derive(Debug)]
pub struct DepositTrc10Actuator {
    event: DepositTrc10Event,
    task: Option<TransactionTask>,
}

impl DepositTrc10Actuator {
    pub fn new(
        from: &str,
        token_id: &str,
        token_value: &str,
        nonce: &str,
    ) -> Result<Self, ActuatorError> {
        Ok(Self::with_event(DepositTrc10Event::decode(
            from,
            token_id,
            token_value,
            nonce,
        )?))
    }

    pub fn from_envelope(envelope: &EventEnvelope) -> Result<Self, ActuatorError> {
        Ok(Self::with_event(envelope.unpack()?))
    }

    fn with_event(event: DepositTrc10Event) -> Self {
        Self { event, task: None }
    }
}

#[async_trait]
impl Actuator for DepositTrc10Actuator {
    fn event_type(&self) -> EventType {
        EventType::DepositTrc10
    }

    fn key(&self) -> &[u8] {
        &self.event.nonce
    }

    fn nonce(&self) -> Option<String> {
        None
    }

    fn to_envelope(&self) -> Result<EventEnvelope, ActuatorError> {
        Ok(EventEnvelope::pack(&self.event)?)
    }

    async fn create_transaction_task(
        &mut self,
        api: &dyn ChainGatewayApi,
    ) -> Result<TransactionTask, ActuatorError> {
        if let Some(task) = &self.task {
            return Ok(task.clone());
        }
        let from = self.event.from.to_base58check();
        let nonce = hex::encode(&self.event.nonce);
        info!(
            %from,
            token_id = %self.event.token_id,
            token_value = %self.event.token_value,
            %nonce,
            "Building TRC10 deposit mint"
        );
        let transaction = api
            .mint_trc10(&from, &self.event.token_id, &self.event.token_value, &nonce)
            .await?;
        Ok(remember(
            &mut self.task,
            TransactionTask {
                kind: TaskKind::SideChain,
                nonce,
                transaction,
            },
        ))
    }
}

#[derive(Debug)]
pub struct DepositTrc20Actuator {
    event: DepositTrc20Event,
    task: Option<TransactionTask>,
}

impl DepositTrc20Actuator {
    pub fn new(
        from: &str,
        contract_address: &str,
        value: &str,
        nonce: &str,
    ) -> Result<Self, ActuatorError> {
        Ok(Self::with_event(DepositTrc20Event::decode(
            from,
            contract_address,
            value,
            nonce,
        )?))
    }

    pub fn from_envelope(envelope: &EventEnvelope) -> Result<Self, ActuatorError> {
        Ok(Self::with_event(envelope.unpack()?))
    }

    fn with_event(event: DepositTrc20Event) -> Self {
        Self { event, task: None }
    }
}

#[async_trait]
impl Actuator for DepositTrc20Actuator {
    fn event_type(&self) -> EventType {
        EventType::DepositTrc20
    }

    fn key(&self) -> &[u8] {
        &self.event.nonce
    }

    fn nonce(&self) -> Option<String> {
        None
    }

    fn to_envelope(&self) -> Result<EventEnvelope, ActuatorError> {
        Ok(EventEnvelope::pack(&self.event)?)
    }

    async fn create_transaction_task(
        &mut self,
        api: &dyn ChainGatewayApi,
    ) -> Result<TransactionTask, ActuatorError> {
        if let Some(task) = &self.task {
            return Ok(task.clone());
        }
        let from = self.event.from.to_base58check();
        let contract_address = self.event.contract_address.to_base58check();
        let nonce = hex::encode(&self.event.nonce);
        info!(
            %from,
            %contract_address,
            value = %self.event.value,
            %nonce,
            "Building TRC20 deposit mint"
        );
        let transaction = api
            .mint_trc20(&from, &contract_address, &self.event.value, &nonce)
            .await?;
        Ok(remember(
            &mut self.task,
            TransactionTask {
                kind: TaskKind::SideChain,
                nonce,
                transaction,
            },
        ))
    }
}

#[derive(Debug)]
pub struct DepositTrc721Actuator {
    event: DepositTrc721Event,
    task: Option<TransactionTask>,
}

impl DepositTrc721Actuator {
    pub fn new(
        from: &str,
        contract_address: &str,
        uid: &str,
        nonce: &str,
    ) -> Result<Self, ActuatorError> {
        Ok(Self::with_event(DepositTrc721Event::decode(
            from,
            contract_address,
            uid,
            nonce,
        )?))
    }

    pub fn from_envelope(envelope: &EventEnvelope) -> Result<Self, ActuatorError> {
        Ok(Self::with_event(envelope.unpack()?))
    }

    fn with_event(event: DepositTrc721Event) -> Self {
        Self { event, task: None }
    }
}

#[async_trait]
impl Actuator for DepositTrc721Actuator {
    fn event_type(&self) -> EventType {
        EventType::DepositTrc721
    }

    fn key(&self) -> &[u8] {
        &self.event.nonce
    }

    fn nonce(&self) -> Option<String> {
        None
    }

    fn to_envelope(&self) -> Result<EventEnvelope, ActuatorError> {
        Ok(EventEnvelope::pack(&self.event)?)
    }

    async fn create_transaction_task(
        &mut self,
        api: &dyn ChainGatewayApi,
    ) -> Result<TransactionTask, ActuatorError> {
        if let Some(task) = &self.task {
            return Ok(task.clone());
        }
        let from = self.event.from.to_base58check();
        let contract_address = self.event.contract_address.to_base58check();
        let nonce = hex::encode(&self.event.nonce);
        info!(
            %from,
            %contract_address,
            uid = %self.event.uid,
            %nonce,
            "Building TRC721 deposit mint"
        );
        let transaction = api
            .mint_trc721(&from, &contract_address, &self.event.uid, &nonce)
            .await?;
        Ok(remember(
            &mut self.task,
            TransactionTask {
                kind: TaskKind::SideChain,
                nonce,
                transaction,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeGateway, address};

    #[tokio::test]
    async fn test_deposit_task_targets_side_chain_with_hex_nonce() {
        let gateway = FakeGateway::new();
        let mut actuator =
            DepositTrc20Actuator::new(&address(1), &address(2), "7", "0x00ff").unwrap();

        assert_eq!(actuator.key(), &[0x00, 0xff]);
        let task = actuator.create_transaction_task(&gateway).await.unwrap();
        assert_eq!(task.kind, TaskKind::SideChain);
        assert_eq!(task.nonce, "00ff");
        assert_eq!(gateway.build_calls(), vec!["mint_trc20".to_string()]);
    }

    #[test]
    fn test_bad_address_is_decode_error() {
        let err = DepositTrxActuator::new("not-an-address", "1", "0x1").unwrap_err();
        assert!(matches!(err, ActuatorError::Decode(_)));
    }

    #[tokio::test]
    async fn test_rejected_build_is_surfaced() {
        let gateway = FakeGateway::new();
        gateway.fail_builds_with(crate::gateway::GatewayError::Rejected("no".to_string()));
        let mut actuator = DepositTrc721Actuator::new(&address(1), &address(2), "9", "0b").unwrap();
        let err = actuator.create_transaction_task(&gateway).await.unwrap_err();
        assert!(matches!(err, ActuatorError::Rejected(_)));
    }
}
