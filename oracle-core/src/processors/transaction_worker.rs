//! TransactionWorker processor.
//!
//! The TransactionWorker is responsible for:
//! - Receiving dispatched actuators from the event loops
//! - Building each counterpart transaction through the chain gateway
//! - Broadcasting it on the chain named by the task
//! - Recording SUCCESS or FAIL in the nonce status store
//!
//! Connectivity failures leave the key PROCESSING; the next sighting after
//! the retry timeout dispatches it again.

use crate::actuators::{Actuator, ActuatorError};
use crate::events::ActuatorReceiver;
use crate::gateway::ChainGatewayApi;
use crate::store::{NonceStatusStore, NonceStores};
use std::sync::Arc;
use tokio::sync::{Semaphore, watch};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Default number of transactions built or broadcast at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// What happened to one dispatched actuator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Broadcast accepted; carries the transaction id.
    Credited(String),
    /// Gateway unreachable; key left PROCESSING.
    Deferred,
    /// Gateway refused; key marked FAIL.
    Failed,
}

pub struct TransactionWorker {
    gateway: Arc<dyn ChainGatewayApi>,
    stores: NonceStores,
    actuator_rx: ActuatorReceiver,
    shutdown_rx: watch::Receiver<bool>,
    max_concurrency: usize,
}

impl TransactionWorker {
    /// Create a new TransactionWorker.
    ///
    /// # Arguments
    ///
    /// * `gateway` - Chain API used to build and broadcast
    /// * `stores` - Nonce status stores, one per chain
    /// * `actuator_rx` - Receiver for dispatched actuators
    /// * `shutdown_rx` - Receiver for shutdown signal
    /// * `max_concurrency` - Upper bound on concurrently executing tasks
    pub fn new(
        gateway: Arc<dyn ChainGatewayApi>,
        stores: NonceStores,
        actuator_rx: ActuatorReceiver,
        shutdown_rx: watch::Receiver<bool>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            gateway,
            stores,
            actuator_rx,
            shutdown_rx,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Run until shutdown or until every sender is gone, then wait for
    /// in-flight tasks.
    pub async fn run(mut self) {
        info!(max_concurrency = self.max_concurrency, "TransactionWorker started");

        let permits = Arc::new(Semaphore::new(self.max_concurrency));
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                biased;

                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        info!("TransactionWorker received shutdown signal");
                        break;
                    }
                }

                Some(done) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = done {
                        error!(error = %e, "Transaction task panicked");
                    }
                }

                Some(actuator) = self.actuator_rx.recv() => {
                    let Ok(permit) = permits.clone().acquire_owned().await else {
                        break;
                    };
                    let gateway = self.gateway.clone();
                    let store = self.stores.for_event(actuator.event_type()).clone();
                    in_flight.spawn(async move {
                        let _permit = permit;
                        execute(gateway.as_ref(), &store, actuator).await
                    });
                }

                else => {
                    info!("Actuator channel closed");
                    break;
                }
            }
        }

        debug!(pending = in_flight.len(), "Draining in-flight transactions");
        while let Some(done) = in_flight.join_next().await {
            if let Err(e) = done {
                error!(error = %e, "Transaction task panicked");
            }
        }

        info!("TransactionWorker shutdown complete");
    }
}

/// Build, broadcast and record the outcome for one actuator.
pub async fn execute(
    gateway: &dyn ChainGatewayApi,
    store: &NonceStatusStore,
    mut actuator: Box<dyn Actuator>,
) -> TaskOutcome {
    let nonce = actuator.display_nonce();
    let event_type = actuator.event_type();

    let broadcast = match actuator.create_transaction_task(gateway).await {
        Ok(task) => gateway.broadcast(&task).await.map_err(ActuatorError::from),
        Err(e) => Err(e),
    };

    match broadcast {
        Ok(tx_id) => {
            info!(%nonce, %event_type, %tx_id, "Transaction broadcast");
            if let Err(e) = store.set_success(actuator.key()).await {
                error!(%nonce, %event_type, error = %e, "Failed to record success");
            }
            TaskOutcome::Credited(tx_id)
        }
        Err(ActuatorError::RemoteConnect(msg)) => {
            warn!(%nonce, %event_type, error = %msg, "Gateway unreachable, will retry after timeout");
            TaskOutcome::Deferred
        }
        Err(e) => {
            warn!(%nonce, %event_type, error = %e, "Transaction rejected");
            if let Err(e) = store.set_fail(actuator.key()).await {
                error!(%nonce, %event_type, error = %e, "Failed to record failure");
            }
            TaskOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuators::{DepositTrxActuator, WithdrawTrxActuator};
    use crate::events::actuator_channel;
    use crate::gateway::GatewayError;
    use crate::store::MemoryKvStore;
    use crate::test_utils::{FakeGateway, address};
    use oracle_sdk::objects::{NonceStatus, TaskKind};
    use std::time::Duration;

    fn store() -> Arc<NonceStatusStore> {
        Arc::new(NonceStatusStore::new(
            Arc::new(MemoryKvStore::new()),
            Duration::from_secs(300),
        ))
    }

    async fn processing(store: &NonceStatusStore, actuator: &dyn Actuator) {
        store
            .set_processing(actuator.key(), &actuator.to_envelope().unwrap(), 0)
            .await
            .unwrap();
    }

    async fn status(store: &NonceStatusStore, key: &[u8]) -> NonceStatus {
        store.get(key).await.unwrap().unwrap().status
    }

    #[tokio::test]
    async fn test_broadcast_marks_success() {
        let gateway = FakeGateway::new();
        let store = store();
        let actuator = DepositTrxActuator::new(&address(1), "100", "0x1").unwrap();
        processing(&store, &actuator).await;

        let outcome = execute(&gateway, &store, Box::new(actuator)).await;
        assert_eq!(outcome, TaskOutcome::Credited("mint_trx-01".to_string()));
        assert_eq!(status(&store, &[0x01]).await, NonceStatus::Success);
        assert_eq!(gateway.broadcasts()[0].kind, TaskKind::SideChain);
    }

    #[tokio::test]
    async fn test_rejection_marks_fail() {
        let gateway = FakeGateway::new();
        gateway.fail_broadcasts_with(GatewayError::Rejected("SIGERROR".to_string()));
        let store = store();
        let actuator = WithdrawTrxActuator::new("4", &address(1), "1", "beef").unwrap();
        processing(&store, &actuator).await;

        let outcome = execute(&gateway, &store, Box::new(actuator)).await;
        assert_eq!(outcome, TaskOutcome::Failed);
        assert_eq!(status(&store, b"4").await, NonceStatus::Fail);
    }

    #[tokio::test]
    async fn test_connect_error_leaves_processing() {
        let gateway = FakeGateway::new();
        gateway.fail_builds_with(GatewayError::Connect("timeout".to_string()));
        let store = store();
        let actuator = WithdrawTrxActuator::new("4", &address(1), "1", "beef").unwrap();
        processing(&store, &actuator).await;

        let outcome = execute(&gateway, &store, Box::new(actuator)).await;
        assert_eq!(outcome, TaskOutcome::Deferred);
        assert_eq!(status(&store, b"4").await, NonceStatus::Processing);
        assert!(gateway.broadcasts().is_empty());
    }

    #[tokio::test]
    async fn test_run_routes_each_chain_to_its_store_and_drains() {
        let gateway = Arc::new(FakeGateway::new());
        let stores = NonceStores {
            main_chain: store(),
            side_chain: store(),
        };
        let (tx, rx) = actuator_channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let deposit = DepositTrxActuator::new(&address(1), "100", "0x31").unwrap();
        let withdraw = WithdrawTrxActuator::new("1", &address(1), "1", "beef").unwrap();
        processing(&stores.main_chain, &deposit).await;
        processing(&stores.side_chain, &withdraw).await;

        tx.send(Box::new(deposit)).await.unwrap();
        tx.send(Box::new(withdraw)).await.unwrap();
        drop(tx);

        TransactionWorker::new(gateway.clone(), stores.clone(), rx, shutdown_rx, 1)
            .run()
            .await;

        // Both keys are the byte 0x31 but live in separate namespaces.
        assert_eq!(status(&stores.main_chain, b"1").await, NonceStatus::Success);
        assert_eq!(status(&stores.side_chain, b"1").await, NonceStatus::Success);
        assert_eq!(gateway.broadcasts().len(), 2);
    }
}
