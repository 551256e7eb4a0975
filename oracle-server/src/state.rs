//! Application state shared across all request handlers.

use oracle_core::events::{ChannelEventPublisher, EventChain};
use oracle_core::store::{NonceStatusStore, NonceStores};
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc or
/// a channel handle).
#[derive(Clone)]
pub struct AppState {
    /// Publisher into the main-chain event queue.
    pub main_chain_events: ChannelEventPublisher,
    /// Publisher into the side-chain event queue.
    pub side_chain_events: ChannelEventPublisher,
    /// Nonce status stores, one per chain.
    pub stores: NonceStores,
}

impl AppState {
    pub fn new(
        main_chain_events: ChannelEventPublisher,
        side_chain_events: ChannelEventPublisher,
        stores: NonceStores,
    ) -> Self {
        Self {
            main_chain_events,
            side_chain_events,
            stores,
        }
    }

    pub fn publisher(&self, chain: EventChain) -> &ChannelEventPublisher {
        match chain {
            EventChain::MainChain => &self.main_chain_events,
            EventChain::SideChain => &self.side_chain_events,
        }
    }

    pub fn store(&self, chain: EventChain) -> &Arc<NonceStatusStore> {
        self.stores.for_chain(chain)
    }
}
