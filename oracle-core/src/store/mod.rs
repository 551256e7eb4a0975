//! Durable per-nonce processing state.
//!
//! [`NonceStatusStore`] holds the PROCESSING / SUCCESS / FAIL lifecycle on
//! top of a plain byte [`KvStore`]. Two backends are provided: SQLite for
//! production and an in-memory map for tests and throwaway runs.

mod memory;
mod nonce_status;
mod sqlite;

pub use memory::MemoryKvStore;
pub use nonce_status::{DEFAULT_RETRY_TIMEOUT, NonceStatusStore};
pub use sqlite::{GetNonceEntry, PutNonceEntry, SqliteKvStore};

use crate::events::EventChain;
use async_trait::async_trait;
use oracle_sdk::objects::EventType;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing database failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backend refused the operation for a non-database reason.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be parsed.
    #[error("corrupt record for key {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be serialized.
    #[error("failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),

    /// A terminal transition was requested for a key with no record.
    #[error("no record for key {0}")]
    Missing(String),
}

/// Local byte-oriented key-value storage.
///
/// Implementations are expected to be fast local I/O; a single `put` is the
/// unit of consistency.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Insert or overwrite the value under `key`.
    async fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError>;
}

/// One [`NonceStatusStore`] per emitting gateway, selected by event type.
#[derive(Clone)]
pub struct NonceStores {
    pub main_chain: Arc<NonceStatusStore>,
    pub side_chain: Arc<NonceStatusStore>,
}

impl NonceStores {
    pub fn for_chain(&self, chain: EventChain) -> &Arc<NonceStatusStore> {
        match chain {
            EventChain::MainChain => &self.main_chain,
            EventChain::SideChain => &self.side_chain,
        }
    }

    /// Store holding the status of an event of this type.
    pub fn for_event(&self, event_type: EventType) -> &Arc<NonceStatusStore> {
        self.for_chain(EventChain::of_event(event_type))
    }
}
