//! Withdrawal actuators: events from the side-chain gateway.
//!
//! The decimal nonce is both the display nonce and, as UTF-8, the dedup key.

use super::{Actuator, ActuatorError, remember};
use crate::gateway::ChainGatewayApi;
use async_trait::async_trait;
use oracle_sdk::objects::{
    EventEnvelope, EventType, TaskKind, TransactionTask, WithdrawTrc10Event, WithdrawTrc20Event,
    WithdrawTrc721Event, WithdrawTrxEvent,
};
use tracing::info;

#[derive(Debug)]
pub struct WithdrawTrxActuator {
    event: WithdrawTrxEvent,
    task: Option<TransactionTask>,
}

impl WithdrawTrxActuator {
    pub fn new(
        nonce: &str,
        from: &str,
        value: &str,
        user_sign: &str,
    ) -> Result<Self, ActuatorError> {
        Ok(Self::with_event(WithdrawTrxEvent::decode(
            nonce, from, value, user_sign,
        )?))
    }

    pub fn from_envelope(envelope: &EventEnvelope) -> Result<Self, ActuatorError> {
        Ok(Self::with_event(envelope.unpack()?))
    }

    fn with_event(event: WithdrawTrxEvent) -> Self {
        Self { event, task: None }
    }
}

#[async_trait]
impl Actuator for WithdrawTrxActuator {
    fn event_type(&self) -> EventType {
        EventType::WithdrawTrx
    }

    fn key(&self) -> &[u8] {
        self.event.nonce.as_bytes()
    }

    fn nonce(&self) -> Option<String> {
        Some(self.event.nonce.clone())
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
        let user_sign = hex::encode(&self.event.user_sign);
        info!(
            %from,
            value = %self.event.value,
            nonce = %self.event.nonce,
            "Building TRX withdrawal"
        );
        let transaction = api
            .withdraw_trx(&from, &self.event.value, &user_sign, &self.event.nonce)
            .await?;
        Ok(remember(
            &mut self.task,
            TransactionTask {
                kind: TaskKind::SideChain,
                nonce: self.event.nonce.clone(),
                transaction,
            },
        ))
    }
}

#[derive(Debug)]
pub struct WithdrawTrc10Actuator {
    event: WithdrawTrc10Event,
    task: Option<TransactionTask>,
}

impl WithdrawTrc10Actuator {
    pub fn new(
        nonce: &str,
        from: &str,
        token_id: &str,
        token_value: &str,
        user_sign: &str,
    ) -> Result<Self, ActuatorError> {
        Ok(Self::with_event(WithdrawTrc10Event::decode(
            nonce,
            from,
            token_id,
            token_value,
            user_sign,
        )?))
    }

    pub fn from_envelope(envelope: &EventEnvelope) -> Result<Self, ActuatorError> {
        Ok(Self::with_event(envelope.unpack()?))
    }

    fn with_event(event: WithdrawTrc10Event) -> Self {
        Self { event, task: None }
    }
}

#[async_trait]
impl Actuator for WithdrawTrc10Actuator {
    fn event_type(&self) -> EventType {
        EventType::WithdrawTrc10
    }

    fn key(&self) -> &[u8] {
        self.event.nonce.as_bytes()
    }

    fn nonce(&self) -> Option<String> {
        Some(self.event.nonce.clone())
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
        let user_sign = hex::encode(&self.event.user_sign);
        info!(
            %from,
            token_id = %self.event.token_id,
            token_value = %self.event.token_value,
            nonce = %self.event.nonce,
            "Building TRC10 withdrawal"
        );
        let transaction = api
            .withdraw_trc10(
                &from,
                &self.event.token_id,
                &self.event.token_value,
                &user_sign,
                &self.event.nonce,
            )
            .await?;
        Ok(remember(
            &mut self.task,
            TransactionTask {
                kind: TaskKind::SideChain,
                nonce: self.event.nonce.clone(),
                transaction,
            },
        ))
    }
}

#[derive(Debug)]
pub struct WithdrawTrc20Actuator {
    event: WithdrawTrc20Event,
    task: Option<TransactionTask>,
}

impl WithdrawTrc20Actuator {
    pub fn new(
        nonce: &str,
        from: &str,
        value: &str,
        main_chain_address: &str,
        user_sign: &str,
    ) -> Result<Self, ActuatorError> {
        Ok(Self::with_event(WithdrawTrc20Event::decode(
            nonce,
            from,
            value,
            main_chain_address,
            user_sign,
        )?))
    }

    pub fn from_envelope(envelope: &EventEnvelope) -> Result<Self, ActuatorError> {
        Ok(Self::with_event(envelope.unpack()?))
    }

    fn with_event(event: WithdrawTrc20Event) -> Self {
        Self { event, task: None }
    }
}

#[async_trait]
impl Actuator for WithdrawTrc20Actuator {
    fn event_type(&self) -> EventType {
        EventType::WithdrawTrc20
    }

    fn key(&self) -> &[u8] {
        self.event.nonce.as_bytes()
    }

    fn nonce(&self) -> Option<String> {
        Some(self.event.nonce.clone())
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
        let main_chain_address = self.event.main_chain_address.to_base58check();
        let user_sign = hex::encode(&self.event.user_sign);
        info!(
            %from,
            %main_chain_address,
            value = %self.event.value,
            nonce = %self.event.nonce,
            "Building TRC20 withdrawal"
        );
        let transaction = api
            .withdraw_trc20(
                &from,
                &main_chain_address,
                &self.event.value,
                &user_sign,
                &self.event.nonce,
            )
            .await?;
        Ok(remember(
            &mut self.task,
            TransactionTask {
                kind: TaskKind::SideChain,
                nonce: self.event.nonce.clone(),
                transaction,
            },
        ))
    }
}

#[derive(Debug)]
pub struct WithdrawTrc721Actuator {
    event: WithdrawTrc721Event,
    task: Option<TransactionTask>,
}

impl WithdrawTrc721Actuator {
    pub fn new(
        nonce: &str,
        from: &str,
        token_id: &str,
        main_chain_address: &str,
        user_sign: &str,
    ) -> Result<Self, ActuatorError> {
        Ok(Self::with_event(WithdrawTrc721Event::decode(
            nonce,
            from,
            token_id,
            main_chain_address,
            user_sign,
        )?))
    }

    pub fn from_envelope(envelope: &EventEnvelope) -> Result<Self, ActuatorError> {
        Ok(Self::with_event(envelope.unpack()?))
    }

    fn with_event(event: WithdrawTrc721Event) -> Self {
        Self { event, task: None }
    }
}

#[async_trait]
impl Actuator for WithdrawTrc721Actuator {
    fn event_type(&self) -> EventType {
        EventType::WithdrawTrc721
    }

    fn key(&self) -> &[u8] {
        self.event.nonce.as_bytes()
    }

    fn nonce(&self) -> Option<String> {
        Some(self.event.nonce.clone())
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
        let main_chain_address = self.event.main_chain_address.to_base58check();
        let user_sign = hex::encode(&self.event.user_sign);
        info!(
            %from,
            %main_chain_address,
            token_id = %self.event.token_id,
            nonce = %self.event.nonce,
            "Building TRC721 withdrawal"
        );
        let transaction = api
            .withdraw_trc721(
                &from,
                &main_chain_address,
                &self.event.token_id,
                &user_sign,
                &self.event.nonce,
            )
            .await?;
        Ok(remember(
            &mut self.task,
            TransactionTask {
                kind: TaskKind::SideChain,
                nonce: self.event.nonce.clone(),
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
    async fn test_withdraw_key_is_decimal_text() {
        let gateway = FakeGateway::new();
        let mut actuator =
            WithdrawTrc721Actuator::new("42", &address(3), "7", &address(4), "0xBEEF").unwrap();

        assert_eq!(actuator.key(), b"42");
        assert_eq!(actuator.nonce().as_deref(), Some("42"));

        let task = actuator.create_transaction_task(&gateway).await.unwrap();
        assert_eq!(task.kind, TaskKind::SideChain);
        assert_eq!(task.nonce, "42");
        assert_eq!(gateway.build_calls(), vec!["withdraw_trc721".to_string()]);
        assert_eq!(gateway.last_user_sign().as_deref(), Some("beef"));
    }

    #[test]
    fn test_hex_nonce_is_rejected() {
        let err = WithdrawTrc10Actuator::new("0x2a", &address(3), "1000001", "1", "beef")
            .unwrap_err();
        assert!(matches!(err, ActuatorError::Decode(_)));
    }
}
