//! Pull/commit event source and its in-process channel implementation.

use super::types::QueueRecord;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum SourceError {
    /// Nothing is listening on the other end of the queue.
    #[error("event queue closed")]
    Closed,

    /// The acknowledgement could not be recorded.
    #[error("commit failed: {0}")]
    Commit(String),
}

/// An at-least-once, offset-committing stream of raw events.
#[async_trait]
pub trait EventSource: Send {
    /// Wait for the next non-empty batch. `None` once the queue is closed and
    /// drained.
    async fn pull(&mut self) -> Result<Option<Vec<QueueRecord>>, SourceError>;

    /// Acknowledge the most recently pulled batch.
    async fn commit(&mut self) -> Result<(), SourceError>;
}

#[derive(Debug, Default)]
struct CommitState {
    commits: u64,
    last_offset: Option<u64>,
}

/// Read-only view of what a [`ChannelEventSource`] has acknowledged.
#[derive(Debug, Clone, Default)]
pub struct CommitHandle {
    state: Arc<Mutex<CommitState>>,
}

impl CommitHandle {
    /// Number of `commit` calls so far.
    pub fn commit_count(&self) -> u64 {
        self.state.lock().map(|s| s.commits).unwrap_or_default()
    }

    /// Highest offset acknowledged so far.
    pub fn last_committed(&self) -> Option<u64> {
        self.state.lock().ok().and_then(|s| s.last_offset)
    }
}

/// Publishing side of an in-process queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ChannelEventPublisher {
    tx: mpsc::Sender<QueueRecord>,
    next_offset: Arc<tokio::sync::Mutex<u64>>,
}

impl ChannelEventPublisher {
    /// Append a raw event and return its offset.
    ///
    /// Waits for buffer space when the consumer is behind.
    pub async fn publish(&self, key: Option<String>, value: String) -> Result<u64, SourceError> {
        // Held across the send so offsets follow channel order.
        let mut next = self.next_offset.lock().await;
        let offset = *next;
        self.tx
            .send(QueueRecord { key, value, offset })
            .await
            .map_err(|_| SourceError::Closed)?;
        *next += 1;
        Ok(offset)
    }
}

/// Consuming side of an in-process queue.
pub struct ChannelEventSource {
    rx: mpsc::Receiver<QueueRecord>,
    batch_size: usize,
    pulled_up_to: Option<u64>,
    commits: CommitHandle,
}

#[async_trait]
impl EventSource for ChannelEventSource {
    async fn pull(&mut self) -> Result<Option<Vec<QueueRecord>>, SourceError> {
        let Some(first) = self.rx.recv().await else {
            return Ok(None);
        };
        let mut batch = Vec::with_capacity(self.batch_size);
        batch.push(first);
        while batch.len() < self.batch_size {
            match self.rx.try_recv() {
                Ok(record) => batch.push(record),
                Err(_) => break,
            }
        }
        self.pulled_up_to = batch.last().map(|r| r.offset);
        Ok(Some(batch))
    }

    async fn commit(&mut self) -> Result<(), SourceError> {
        let mut state = self
            .commits
            .state
            .lock()
            .map_err(|e| SourceError::Commit(e.to_string()))?;
        state.commits += 1;
        if self.pulled_up_to.is_some() {
            state.last_offset = self.pulled_up_to;
        }
        Ok(())
    }
}

/// Create an in-process queue.
///
/// # Arguments
///
/// * `buffer` - Channel capacity
/// * `batch_size` - Maximum records returned by one `pull`
pub fn event_queue(
    buffer: usize,
    batch_size: usize,
) -> (ChannelEventPublisher, ChannelEventSource, CommitHandle) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    let commits = CommitHandle::default();
    let publisher = ChannelEventPublisher {
        tx,
        next_offset: Arc::new(tokio::sync::Mutex::new(0)),
    };
    let source = ChannelEventSource {
        rx,
        batch_size: batch_size.max(1),
        pulled_up_to: None,
        commits: commits.clone(),
    };
    (publisher, source, commits)
}
