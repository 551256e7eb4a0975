//! Hand-off point between the event loops and transaction construction.

use crate::actuators::Actuator;
use crate::events::ActuatorSender;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("transaction worker is not accepting tasks")]
    Closed,
}

/// Fire-and-forget dispatch of an actuator.
///
/// Returning `Ok` means the actuator was accepted, not that a transaction
/// was built or broadcast.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit(&self, actuator: Box<dyn Actuator>) -> Result<(), SubmitError>;
}

/// Submitter backed by the transaction worker's bounded channel.
#[derive(Clone)]
pub struct ChannelSubmitter {
    tx: ActuatorSender,
}

impl ChannelSubmitter {
    pub fn new(tx: ActuatorSender) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl TransactionSubmitter for ChannelSubmitter {
    async fn submit(&self, actuator: Box<dyn Actuator>) -> Result<(), SubmitError> {
        self.tx.send(actuator).await.map_err(|_| SubmitError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuators::WithdrawTrxActuator;
    use crate::events::actuator_channel;
    use crate::test_utils::address;

    #[tokio::test]
    async fn test_channel_submitter_delivers_and_reports_closed() {
        let (tx, mut rx) = actuator_channel();
        let submitter = ChannelSubmitter::new(tx);

        let actuator = WithdrawTrxActuator::new("5", &address(1), "1", "beef").unwrap();
        submitter.submit(Box::new(actuator)).await.unwrap();
        let received = rx.recv().await.unwrap();
        assert_eq!(received.nonce().as_deref(), Some("5"));

        drop(rx);
        let again = WithdrawTrxActuator::new("6", &address(1), "1", "beef").unwrap();
        assert!(matches!(
            submitter.submit(Box::new(again)).await,
            Err(SubmitError::Closed)
        ));
    }
}
