//! Persistence of sent messages and failure-resilient recording.
//!
//! Defines the [`MessageStore`] trait, the [`MessageRecord`] it stores, and
//! [`ResilientRecorder`] which wraps any store so that a failed write never
//! changes the outcome of the send that produced it.
//!
//! Implementations:
//! - [`InMemoryStore`]: process-local store for tests and dry runs
//! - [`jsonl::JsonlStore`]: append-only JSON lines file

pub mod jsonl;

use std::collections::VecDeque;
use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use chatwin_proto::chain::{MessageChain, MessageId, MessageKind, Timestamp};
use chatwin_proto::codec::CodecError;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying storage is full or unavailable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A write operation failed.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// A read operation failed.
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// A record could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// An underlying I/O error occurred.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One sent message as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Id the remote side assigned.
    pub message_id: MessageId,
    /// The chain exactly as handed to the adapter.
    pub chain: MessageChain,
    /// The bot's own account.
    pub sender_id: i64,
    /// Friend, group or member the message went to.
    pub receiver_id: i64,
    /// Which window variant sent it.
    pub kind: MessageKind,
    /// When the record was created.
    pub timestamp: Timestamp,
}

impl MessageRecord {
    /// Builds a record stamped with the current time.
    #[must_use]
    pub fn new(
        message_id: MessageId,
        chain: MessageChain,
        sender_id: i64,
        receiver_id: i64,
        kind: MessageKind,
    ) -> Self {
        Self {
            message_id,
            chain,
            sender_id,
            receiver_id,
            kind,
            timestamp: Timestamp::now(),
        }
    }
}

/// Trait for persisting sent messages.
pub trait MessageStore: Send + Sync {
    /// Persist one record.
    fn save(&self, record: &MessageRecord) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Records sent to `receiver_id`, most recent first, at most `limit`.
    fn by_receiver(
        &self,
        receiver_id: i64,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<MessageRecord>, StoreError>> + Send;
}

/// Wraps a [`MessageStore`] so write failures never surface to the sender.
///
/// When a save fails, the recorder:
/// 1. Logs the error via `tracing::warn!`
/// 2. Queues the record for retry
///
/// Queued records are retried by [`flush_pending`](Self::flush_pending).
pub struct ResilientRecorder<S: MessageStore> {
    /// The underlying store.
    store: S,
    /// Records whose save failed, oldest first.
    pending: Mutex<VecDeque<MessageRecord>>,
}

impl<S: MessageStore> ResilientRecorder<S> {
    /// Wrap `store`.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// The wrapped store, for reads.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Save a record, queueing it for retry on failure.
    pub async fn record(&self, record: MessageRecord) {
        if let Err(err) = self.store.save(&record).await {
            tracing::warn!(
                message_id = %record.message_id,
                kind = %record.kind,
                error = %err,
                "message sent but could not be recorded"
            );
            self.pending.lock().await.push_back(record);
        }
    }

    /// Retry every queued record once.
    ///
    /// Returns the number of records written.
    pub async fn flush_pending(&self) -> usize {
        let records: Vec<MessageRecord> = self.pending.lock().await.drain(..).collect();
        let total = records.len();
        let mut succeeded = 0;

        for record in records {
            if self.store.save(&record).await.is_ok() {
                succeeded += 1;
            } else {
                self.pending.lock().await.push_back(record);
            }
        }

        if succeeded > 0 {
            tracing::info!(
                succeeded,
                remaining = total - succeeded,
                "flushed pending message records"
            );
        }

        succeeded
    }

    /// Number of records awaiting retry.
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}

/// In-memory implementation of [`MessageStore`].
///
/// Keeps records in insertion order. Nothing survives the process.
pub struct InMemoryStore {
    records: Mutex<Vec<MessageRecord>>,
}

impl InMemoryStore {
    /// Create a new, empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Every record, oldest first.
    pub async fn records(&self) -> Vec<MessageRecord> {
        self.records.lock().await.clone()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageStore for InMemoryStore {
    async fn save(&self, record: &MessageRecord) -> Result<(), StoreError> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }

    async fn by_receiver(
        &self,
        receiver_id: i64,
        limit: usize,
    ) -> Result<Vec<MessageRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .rev()
            .filter(|record| record.receiver_id == receiver_id)
            .take(limit)
            .cloned()
            .collect())
    }
}
