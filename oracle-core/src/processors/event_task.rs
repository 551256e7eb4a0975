//! EventTask processor.
//!
//! One EventTask drains one queue subscription, in order:
//! - Classifying each raw contract event into an actuator (or skipping it)
//! - Checking the actuator's dedup key against the nonce status store
//! - Marking the key PROCESSING and dispatching it when it is due
//! - Committing the batch once every message in it has been evaluated
//!
//! The loop never decides SUCCESS or FAIL; that is the transaction worker's
//! job. Errors are confined to the message that caused them, except a nonce
//! store outage, which holds the message until the store answers again.

use crate::events::{EventChain, EventSource, QueueRecord, SourceError};
use crate::factory::ActuatorFactory;
use crate::store::{NonceStores, StoreError};
use crate::submitter::TransactionSubmitter;
use crate::utils::clock::unix_now;
use oracle_sdk::objects::{NonceStatus, NonceStatusRecord};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, trace, warn};

/// First wait before re-evaluating a message the nonce store could not serve.
const DEFAULT_STORE_BACKOFF: Duration = Duration::from_secs(1);

/// Upper bound for the doubling store backoff.
const MAX_STORE_BACKOFF: Duration = Duration::from_secs(64);

/// Why an event was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchReason {
    /// No record existed for the key.
    FirstSighting,
    /// The previous attempt was rejected by the chain.
    RetryAfterFail,
    /// The previous attempt outlived its retry timeout.
    RetryAfterTimeout,
}

/// What the stored record says should happen to a sighting of its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Dispatch(DispatchReason),
    AlreadyCredited,
    InFlight { next_process_timestamp: i64 },
}

/// Result of evaluating one queue message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Untracked contract or event.
    NotApplicable,
    /// A tracked event whose fields could not be decoded.
    Malformed,
    Dispatched(DispatchReason),
    AlreadyCredited,
    InFlight,
    /// The stored record exists but could not be parsed.
    StatusUnreadable,
    /// The nonce store failed to read or write. The message has not been
    /// evaluated and must not be acknowledged.
    StoreUnavailable,
    /// PROCESSING was written but the submitter refused the actuator.
    SubmitRefused,
}

/// Decide what to do with a key given its stored record at time `now`.
///
/// FAIL is retried unconditionally; PROCESSING only once its deadline has
/// passed (`now >= next_process_timestamp`).
pub fn decide(record: Option<&NonceStatusRecord>, now: i64) -> Decision {
    let Some(record) = record else {
        return Decision::Dispatch(DispatchReason::FirstSighting);
    };
    match record.status {
        NonceStatus::Success => Decision::AlreadyCredited,
        NonceStatus::Fail => Decision::Dispatch(DispatchReason::RetryAfterFail),
        NonceStatus::Processing if record.is_due(now) => {
            Decision::Dispatch(DispatchReason::RetryAfterTimeout)
        }
        NonceStatus::Processing => Decision::InFlight {
            next_process_timestamp: record.next_process_timestamp,
        },
    }
}

/// EventTask consumes one chain's event queue.
pub struct EventTask<S: EventSource> {
    chain: EventChain,
    source: S,
    factory: ActuatorFactory,
    stores: NonceStores,
    submitter: Arc<dyn TransactionSubmitter>,
    shutdown_rx: watch::Receiver<bool>,
    store_backoff: Duration,
}

impl<S: EventSource> EventTask<S> {
    /// Create a new EventTask.
    ///
    /// # Arguments
    ///
    /// * `chain` - Subscription this task drains (used in logs)
    /// * `source` - Queue to pull from and commit to
    /// * `factory` - Classifier for raw events
    /// * `stores` - Nonce status stores; each event uses the one for its type
    /// * `submitter` - Where due actuators are dispatched
    /// * `shutdown_rx` - Receiver for shutdown signal
    pub fn new(
        chain: EventChain,
        source: S,
        factory: ActuatorFactory,
        stores: NonceStores,
        submitter: Arc<dyn TransactionSubmitter>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            chain,
            source,
            factory,
            stores,
            submitter,
            shutdown_rx,
            store_backoff: DEFAULT_STORE_BACKOFF,
        }
    }

    /// Override the initial wait between evaluations of a message the nonce
    /// store could not serve.
    pub fn with_store_backoff(mut self, backoff: Duration) -> Self {
        self.store_backoff = backoff;
        self
    }

    /// Run until shutdown is signalled or the queue closes.
    ///
    /// Shutdown is honoured between batches. The only place it interrupts a
    /// batch is a store outage; that batch is then left uncommitted.
    pub async fn run(mut self) {
        info!(chain = %self.chain, "EventTask started");

        'outer: loop {
            tokio::select! {
                biased;

                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        info!(chain = %self.chain, "EventTask received shutdown signal");
                        break;
                    }
                }

                pulled = self.source.pull() => {
                    let batch = match pulled {
                        Ok(Some(batch)) => batch,
                        Ok(None) | Err(SourceError::Closed) => {
                            info!(chain = %self.chain, "Event queue closed");
                            break;
                        }
                        Err(e) => {
                            error!(chain = %self.chain, error = %e, "Failed to pull events");
                            continue;
                        }
                    };
                    debug!(chain = %self.chain, count = batch.len(), "Pulled events");

                    for record in &batch {
                        let Some(outcome) = self.evaluate(record).await else {
                            warn!(
                                chain = %self.chain,
                                offset = record.offset,
                                "Shutdown while nonce store unavailable, batch left uncommitted"
                            );
                            break 'outer;
                        };
                        trace!(chain = %self.chain, offset = record.offset, ?outcome, "Evaluated event");
                    }

                    if let Err(e) = self.source.commit().await {
                        error!(chain = %self.chain, error = %e, "Failed to commit");
                    }
                }
            }
        }

        info!(chain = %self.chain, "EventTask shutdown complete");
    }

    /// Evaluate `record`, waiting out nonce store outages with a doubling
    /// backoff. `None` if shutdown arrives while waiting.
    async fn evaluate(&mut self, record: &QueueRecord) -> Option<EventOutcome> {
        let mut backoff = self.store_backoff;
        loop {
            let outcome = self.process_record(record, unix_now()).await;
            if outcome != EventOutcome::StoreUnavailable {
                return Some(outcome);
            }

            warn!(
                chain = %self.chain,
                offset = record.offset,
                retry_in = ?backoff,
                "Nonce store unavailable, holding event"
            );
            tokio::select! {
                biased;

                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        return None;
                    }
                }
                _ = tokio::time::sleep(backoff) => {}
            }
            backoff = (backoff * 2).min(MAX_STORE_BACKOFF);
        }
    }

    /// Evaluate one message at time `now`. Never fails; every problem is
    /// logged and reported through the outcome.
    pub async fn process_record(&self, record: &QueueRecord, now: i64) -> EventOutcome {
        let actuator = match self.factory.create_from_json(&record.value) {
            Ok(Some(actuator)) => actuator,
            Ok(None) => return EventOutcome::NotApplicable,
            Err(e) => {
                warn!(
                    chain = %self.chain,
                    offset = record.offset,
                    error = %e,
                    "Dropping malformed event"
                );
                return EventOutcome::Malformed;
            }
        };

        let event_type = actuator.event_type();
        let nonce = actuator.display_nonce();
        let key = actuator.key().to_vec();
        // Same namespace the transaction worker records the outcome in.
        let store = self.stores.for_event(event_type);

        let stored = match store.get(&key).await {
            Ok(stored) => stored,
            Err(e @ StoreError::Corrupt { .. }) => {
                warn!(%nonce, %event_type, error = %e, "Unreadable nonce status, skipping");
                return EventOutcome::StatusUnreadable;
            }
            Err(e) => {
                error!(%nonce, %event_type, error = %e, "Nonce status lookup failed");
                return EventOutcome::StoreUnavailable;
            }
        };

        let reason = match decide(stored.as_ref(), now) {
            Decision::AlreadyCredited => {
                info!(%nonce, %event_type, "Nonce already credited");
                return EventOutcome::AlreadyCredited;
            }
            Decision::InFlight {
                next_process_timestamp,
            } => {
                info!(
                    %nonce,
                    %event_type,
                    next_process_timestamp,
                    "Nonce is processing, not yet due for retry"
                );
                return EventOutcome::InFlight;
            }
            Decision::Dispatch(reason) => reason,
        };

        let envelope = match actuator.to_envelope() {
            Ok(envelope) => envelope,
            Err(e) => {
                error!(%nonce, %event_type, error = %e, "Failed to pack event envelope");
                return EventOutcome::Malformed;
            }
        };

        match store.set_processing(&key, &envelope, now).await {
            Ok(_) => {}
            Err(e @ StoreError::Encode(_)) => {
                error!(%nonce, %event_type, error = %e, "Failed to encode nonce status");
                return EventOutcome::Malformed;
            }
            Err(e) => {
                error!(%nonce, %event_type, error = %e, "Failed to mark nonce processing");
                return EventOutcome::StoreUnavailable;
            }
        }

        if let Err(e) = self.submitter.submit(actuator).await {
            error!(%nonce, %event_type, error = %e, "Failed to dispatch nonce");
            return EventOutcome::SubmitRefused;
        }

        info!(%nonce, %event_type, ?reason, "Dispatched nonce");
        EventOutcome::Dispatched(reason)
    }
}
