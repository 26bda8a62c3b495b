//! History store port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::history::Entry;

/// History store errors
#[derive(Debug, Clone, Error)]
pub enum HistoryStoreError {
    #[error("Failed to read history: {0}")]
    ReadFailed(String),

    #[error("History record is malformed: {0}")]
    Malformed(String),

    #[error("Failed to write history: {0}")]
    WriteFailed(String),
}

/// Port for the durable history record
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Load the ordered entries, newest first.
    ///
    /// A missing record yields an empty list. An unreadable record yields
    /// `Malformed` so the caller can decide to start fresh.
    async fn load(&self) -> Result<Vec<Entry>, HistoryStoreError>;

    /// Replace the durable record with `entries`.
    ///
    /// A crash mid-save must leave the previous record intact.
    async fn save(&self, entries: &[Entry]) -> Result<(), HistoryStoreError>;
}
