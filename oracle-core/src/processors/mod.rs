//! Long-running processors of the relay pipeline.
//!
//! - `EventTask`: drains one chain's event queue, dispatches due actuators
//! - `TransactionWorker`: builds and broadcasts dispatched actuators

pub mod event_task;
pub mod transaction_worker;

pub use event_task::{Decision, DispatchReason, EventOutcome, EventTask, decide};
pub use transaction_worker::{DEFAULT_MAX_CONCURRENCY, TaskOutcome, TransactionWorker};
