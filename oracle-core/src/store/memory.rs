use super::{KvStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Process-local [`KvStore`]. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    reject_writes: AtomicBool,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `get` calls served.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of successful `put` calls.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Make every subsequent `put` fail with [`StoreError::Unavailable`].
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::Relaxed);
    }

    /// Raw value under `key`, bypassing the counters.
    pub fn peek(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        if self.reject_writes.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("writes rejected".to_string()));
        }
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.insert(key.to_vec(), value);
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_reads_and_writes() {
        let store = MemoryKvStore::new();
        store.put(b"a", vec![1]).await.unwrap();
        assert_eq!(store.get(b"a").await.unwrap(), Some(vec![1]));
        assert_eq!(store.get(b"b").await.unwrap(), None);
        assert_eq!(store.reads(), 2);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn test_rejected_write_leaves_value() {
        let store = MemoryKvStore::new();
        store.put(b"a", vec![1]).await.unwrap();
        store.set_reject_writes(true);
        assert!(matches!(
            store.put(b"a", vec![2]).await,
            Err(StoreError::Unavailable(_))
        ));
        assert_eq!(store.peek(b"a"), Some(vec![1]));
    }
}
