//! JSON history record on the local filesystem
//!
//! The record is `{"version": 1, "entries": [...]}` with entries newest
//! first. Saves go through a temp file that is fsynced and renamed over the
//! record, so readers only ever see a complete previous or next version.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::application::ports::{HistoryStore, HistoryStoreError};
use crate::domain::history::Entry;

/// Current on-disk record format
pub const RECORD_VERSION: u32 = 1;

#[derive(Serialize)]
struct RecordOut<'a> {
    version: u32,
    entries: &'a [Entry],
}

#[derive(Deserialize)]
struct RecordIn {
    version: u32,
    entries: Vec<Entry>,
}

/// JSON file history store
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn decode(content: &str) -> Result<Vec<Entry>, HistoryStoreError> {
        let record: RecordIn = serde_json::from_str(content)
            .map_err(|e| HistoryStoreError::Malformed(e.to_string()))?;

        if record.version != RECORD_VERSION {
            return Err(HistoryStoreError::Malformed(format!(
                "unsupported record version {}",
                record.version
            )));
        }
        Ok(record.entries)
    }

    fn encode(entries: &[Entry]) -> Result<Vec<u8>, HistoryStoreError> {
        serde_json::to_vec_pretty(&RecordOut {
            version: RECORD_VERSION,
            entries,
        })
        .map_err(|e| HistoryStoreError::WriteFailed(e.to_string()))
    }

    async fn write_atomically(&self, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let tmp = self.temp_path();
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp, &self.path).await
    }
}

#[async_trait]
impl HistoryStore for JsonHistoryStore {
    async fn load(&self) -> Result<Vec<Entry>, HistoryStoreError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(HistoryStoreError::Malformed(e.to_string()))
            }
            Err(e) => return Err(HistoryStoreError::ReadFailed(e.to_string())),
        };

        let entries = Self::decode(&content)?;
        debug!(path = %self.path.display(), entries = entries.len(), "Loaded history record");
        Ok(entries)
    }

    async fn save(&self, entries: &[Entry]) -> Result<(), HistoryStoreError> {
        let bytes = Self::encode(entries)?;
        self.write_atomically(&bytes)
            .await
            .map_err(|e| HistoryStoreError::WriteFailed(format!("{}: {}", self.path.display(), e)))
    }
}
