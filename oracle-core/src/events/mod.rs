//! Event plumbing for the relay pipeline.
//!
//! # Event Flow
//!
//! 1. Raw contract events are published into a per-chain queue
//! 2. `EventTask` pulls, classifies and dedups them, then dispatches actuators
//! 3. `TransactionWorker` builds and broadcasts, then records SUCCESS or FAIL
//!
//! Queue delivery is at-least-once; the nonce status store turns that into
//! at-most-one successful credit per nonce.

pub mod channels;
pub mod queue;
pub mod types;

pub use channels::{ActuatorReceiver, ActuatorSender, DEFAULT_CHANNEL_BUFFER, actuator_channel};
pub use queue::{
    ChannelEventPublisher, ChannelEventSource, CommitHandle, EventSource, SourceError,
    event_queue,
};
pub use types::{EventChain, QueueRecord};
