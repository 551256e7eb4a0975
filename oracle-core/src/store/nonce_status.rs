use super::{KvStore, StoreError};
use oracle_sdk::objects::{EventEnvelope, NonceStatus, NonceStatusRecord};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// How long a PROCESSING record shields its key from re-dispatch.
pub const DEFAULT_RETRY_TIMEOUT: Duration = Duration::from_secs(300);

/// Nonce-keyed processing state for one queue subscription.
///
/// Reads and writes are single-key; there is no cross-key transaction and no
/// lock. The PROCESSING timestamp is the only concurrency control.
pub struct NonceStatusStore {
    kv: Arc<dyn KvStore>,
    retry_timeout: Duration,
}

impl NonceStatusStore {
    pub fn new(kv: Arc<dyn KvStore>, retry_timeout: Duration) -> Self {
        Self { kv, retry_timeout }
    }

    /// Load the record for `key`.
    ///
    /// A value that is present but unparseable is [`StoreError::Corrupt`].
    pub async fn get(&self, key: &[u8]) -> Result<Option<NonceStatusRecord>, StoreError> {
        let Some(bytes) = self.kv.get(key).await? else {
            return Ok(None);
        };
        NonceStatusRecord::from_bytes(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: hex::encode(key),
                source,
            })
    }

    /// Overwrite `key` with a fresh PROCESSING record due at
    /// `now + retry_timeout`.
    pub async fn set_processing(
        &self,
        key: &[u8],
        envelope: &EventEnvelope,
        now: i64,
    ) -> Result<NonceStatusRecord, StoreError> {
        let timeout = i64::try_from(self.retry_timeout.as_secs()).unwrap_or(i64::MAX);
        let record = NonceStatusRecord {
            status: NonceStatus::Processing,
            next_process_timestamp: now.saturating_add(timeout),
            envelope: envelope.clone(),
        };
        self.write(key, &record).await?;
        Ok(record)
    }

    /// Mark the key as credited.
    pub async fn set_success(&self, key: &[u8]) -> Result<(), StoreError> {
        self.set_terminal(key, NonceStatus::Success).await
    }

    /// Mark the key as permanently failed. The next sighting re-dispatches it.
    pub async fn set_fail(&self, key: &[u8]) -> Result<(), StoreError> {
        self.set_terminal(key, NonceStatus::Fail).await
    }

    async fn set_terminal(&self, key: &[u8], status: NonceStatus) -> Result<(), StoreError> {
        let mut record = self
            .get(key)
            .await?
            .ok_or_else(|| StoreError::Missing(hex::encode(key)))?;
        record.status = status;
        self.write(key, &record).await?;
        debug!(key = %hex::encode(key), %status, "Nonce status updated");
        Ok(())
    }

    async fn write(&self, key: &[u8], record: &NonceStatusRecord) -> Result<(), StoreError> {
        let bytes = record.to_bytes().map_err(StoreError::Encode)?;
        self.kv.put(key, bytes).await
    }
}
