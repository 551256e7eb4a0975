//! Types that travel through the in-process queues.

use oracle_sdk::objects::EventType;
use serde::{Deserialize, Serialize};

/// Which gateway a queue subscription listens to.
///
/// Each chain has its own queue and processing loop. Nonce records live in
/// the namespace of the chain whose gateway emits the event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventChain {
    /// Main-chain gateway: deposits into the bridge.
    MainChain,
    /// Side-chain gateway: withdrawals out of the bridge.
    SideChain,
}

impl EventChain {
    /// Gateway that emits events of this type.
    pub fn of_event(event_type: EventType) -> Self {
        if event_type.is_deposit() {
            EventChain::MainChain
        } else {
            EventChain::SideChain
        }
    }

    /// Store namespace for this chain's nonce records.
    pub fn namespace(&self) -> &'static str {
        match self {
            EventChain::MainChain => "mainchain",
            EventChain::SideChain => "sidechain",
        }
    }
}

impl std::fmt::Display for EventChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.namespace())
    }
}

/// One message pulled from a queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRecord {
    /// Partitioning key as published; unused by the engine.
    pub key: Option<String>,
    /// Raw contract-event JSON.
    pub value: String,
    /// Position in the queue, assigned at publish time.
    pub offset: u64,
}
