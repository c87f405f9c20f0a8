//! Append-only JSON lines message store.
//!
//! Each [`MessageRecord`] is written as one line. Reads scan the whole
//! file; lines that fail to decode are skipped with a warning so that one
//! torn write does not hide the rest of the history.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use chatwin_proto::codec;

use super::{MessageRecord, MessageStore, StoreError};

/// File-backed [`MessageStore`].
pub struct JsonlStore {
    path: PathBuf,
    /// Serializes appends so lines never interleave.
    write_lock: Mutex<()>,
}

impl JsonlStore {
    /// Use (and lazily create) the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<MessageRecord>, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::ReadFailed(e.to_string())),
        };

        let mut records = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match codec::decode_line::<MessageRecord>(line) {
                Ok(record) => records.push(record),
                Err(err) => tracing::warn!(
                    path = %self.path.display(),
                    line = index + 1,
                    error = %err,
                    "skipping unreadable history line"
                ),
            }
        }
        Ok(records)
    }
}

impl MessageStore for JsonlStore {
    async fn save(&self, record: &MessageRecord) -> Result<(), StoreError> {
        let line = codec::encode_line(record)?;
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn by_receiver(
        &self,
        receiver_id: i64,
        limit: usize,
    ) -> Result<Vec<MessageRecord>, StoreError> {
        let mut records = self.read_all().await?;
        records.retain(|record| record.receiver_id == receiver_id);
        records.reverse();
        records.truncate(limit);
        Ok(records)
    }
}
