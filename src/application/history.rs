//! Clipboard history use case
//!
//! Owns the history state and orchestrates the blob store, the history
//! store and the clipboard. Every mutating operation holds the state lock
//! for its whole duration, including disk I/O, so mutations never interleave.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::history::{
    Entry, EntryId, EntryPayload, HistoryState, PushOutcome, Sample, HISTORY_LIMIT,
};
use crate::domain::time::Duration;

use super::ports::{
    BlobStore, BlobStoreError, Clipboard, ClipboardError, HistoryObserver, HistoryStore, Paster,
};

/// Delay before the paste chord is sent, giving the previous window time to regain focus
pub const DEFAULT_PASTE_DELAY_MS: u64 = 200;

/// Errors from the history use case
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Blob store failed: {0}")]
    Blob(#[from] BlobStoreError),

    #[error("Clipboard failed: {0}")]
    Clipboard(#[from] ClipboardError),
}

/// Configuration for the history engine
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Maximum number of retained entries
    pub history_limit: usize,
    /// Whether `use_entry` pastes into the target window afterwards
    pub autopaste: bool,
    /// Wait before pasting
    pub paste_delay: StdDuration,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            history_limit: HISTORY_LIMIT,
            autopaste: false,
            paste_delay: StdDuration::from_millis(DEFAULT_PASTE_DELAY_MS),
        }
    }
}

/// Outcome of ingesting one sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A new entry is now at the front
    Added(Entry),
    /// The sample repeated the last ingested signature
    Skipped,
}

/// Result of a retention sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Entries older than the cutoff
    pub expired: usize,
    /// Image entries dropped because their blob file was gone
    pub missing_blobs: usize,
    /// Blob files no surviving entry referenced
    pub orphans_removed: usize,
}

/// Clipboard history use case
pub struct ClipboardHistoryUseCase<B, H, C, P, O>
where
    B: BlobStore,
    H: HistoryStore,
    C: Clipboard,
    P: Paster + 'static,
    O: HistoryObserver,
{
    blob_store: B,
    history_store: H,
    clipboard: C,
    paster: Arc<P>,
    observer: O,
    state: Mutex<HistoryState>,
    config: HistoryConfig,
}

impl<B, H, C, P, O> ClipboardHistoryUseCase<B, H, C, P, O>
where
    B: BlobStore,
    H: HistoryStore,
    C: Clipboard,
    P: Paster + 'static,
    O: HistoryObserver,
{
    /// Create a new use case with an empty history
    pub fn new(
        blob_store: B,
        history_store: H,
        clipboard: C,
        paster: P,
        observer: O,
        config: HistoryConfig,
    ) -> Self {
        Self {
            blob_store,
            history_store,
            clipboard,
            paster: Arc::new(paster),
            observer,
            state: Mutex::new(HistoryState::new(config.history_limit)),
            config,
        }
    }

    /// Replace in-memory state with the persisted record.
    ///
    /// A malformed or unreadable record starts a fresh history.
    /// Returns the number of restored entries.
    pub async fn restore(&self) -> usize {
        let entries = match self.history_store.load().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Starting with empty clipboard history");
                Vec::new()
            }
        };

        let (restored, dropped) = HistoryState::restore(entries, self.config.history_limit);

        let mut state = self.state.lock().await;
        *state = restored;

        if !dropped.is_empty() {
            debug!(dropped = dropped.len(), "Dropped surplus entries from persisted history");
            if self.persist(&state).await {
                self.release_blobs(&dropped).await;
            }
        }
        self.notify(&state);

        info!(entries = state.len(), "Restored clipboard history");
        state.len()
    }

    /// Ordered copy of the current history, newest first
    pub async fn snapshot(&self) -> Vec<Entry> {
        self.state.lock().await.snapshot()
    }

    /// Number of retained entries
    pub async fn len(&self) -> usize {
        self.state.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.is_empty()
    }

    /// Read the clipboard once and ingest what it holds.
    ///
    /// Returns `None` when the clipboard holds nothing ingestible.
    pub async fn poll(&self) -> Result<Option<IngestOutcome>, HistoryError> {
        match self.clipboard.read().await? {
            Some(sample) => self.ingest(sample).await.map(Some),
            None => Ok(None),
        }
    }

    /// Ingest one clipboard sample.
    ///
    /// Skips a sample whose signature equals the last ingested one. Images
    /// are written to the blob store first; if that fails no entry is created
    /// and the sample will be retried on the next call.
    pub async fn ingest(&self, sample: Sample) -> Result<IngestOutcome, HistoryError> {
        let signature = sample.signature();

        let mut state = self.state.lock().await;
        if state.is_repeat(&signature) {
            return Ok(IngestOutcome::Skipped);
        }

        let payload = match sample {
            Sample::Text(content) => EntryPayload::Text { content },
            Sample::Image(bytes) => {
                let blob = self.blob_store.put(&bytes).await?;
                EntryPayload::Image {
                    hash: blob.hash,
                    location: blob.location,
                }
            }
        };

        let outcome = state.push(payload, signature, Utc::now());
        let entry = self.commit(&state, outcome).await;
        debug!(id = %entry.id, kind = %entry.kind(), "Ingested clipboard entry");

        Ok(IngestOutcome::Added(entry))
    }

    /// Copy an entry back to the clipboard and move it to the front.
    ///
    /// Returns `None` if the id is unknown. Promotion always re-persists and
    /// re-notifies, even when the entry is already at the front. When
    /// autopaste is enabled the paste runs detached and its failure is
    /// only logged.
    pub async fn use_entry(
        &self,
        id: EntryId,
        target: Option<String>,
    ) -> Result<Option<Entry>, HistoryError> {
        let mut state = self.state.lock().await;

        let Some(entry) = state.get(id).cloned() else {
            debug!(id = %id, "Use requested for unknown entry");
            return Ok(None);
        };

        match &entry.payload {
            EntryPayload::Text { content } => self.clipboard.write_text(content).await?,
            EntryPayload::Image { location, .. } => {
                let bytes = self.blob_store.read(location).await?;
                self.clipboard.write_image(&bytes).await?;
            }
        }

        let Some(outcome) = state.promote(id, Utc::now()) else {
            return Ok(None);
        };
        let promoted = self.commit(&state, outcome).await;
        drop(state);

        if self.config.autopaste {
            self.spawn_paste(target);
        }

        Ok(Some(promoted))
    }

    /// Remove an entry and its blob. Persists and notifies even when the id
    /// is unknown. Returns whether an entry was removed.
    pub async fn delete(&self, id: EntryId) -> bool {
        let mut state = self.state.lock().await;

        let removed = state.remove(id);
        let persisted = self.persist(&state).await;
        if let Some(entry) = removed.as_ref().filter(|_| persisted) {
            self.release_blobs(std::slice::from_ref(entry)).await;
        }

        self.notify(&state);
        removed.is_some()
    }

    /// Remove every entry and every blob file. Returns the number of removed entries.
    pub async fn clear(&self) -> usize {
        let mut state = self.state.lock().await;

        let removed = state.clear();
        // Blobs stay for the next sweep if the old record still references them
        if !self.persist(&state).await {
            self.notify(&state);
            return removed.len();
        }

        match self.blob_store.list_all().await {
            Ok(locations) => {
                for location in &locations {
                    if let Err(e) = self.blob_store.delete(location).await {
                        warn!(location = %location, error = %e, "Failed to delete blob during clear");
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to list blobs during clear");
                self.release_blobs(&removed).await;
            }
        }

        self.notify(&state);
        info!(removed = removed.len(), "Cleared clipboard history");
        removed.len()
    }

    /// Drop entries older than `max_age` and image entries whose blob is
    /// gone, then delete every unreferenced blob.
    pub async fn sweep(&self, max_age: Duration) -> SweepReport {
        let mut state = self.state.lock().await;

        let cutoff = Utc::now() - max_age.as_chrono();
        let expired = state.expire_before(cutoff);

        let stored = match self.blob_store.list_all().await {
            Ok(stored) => Some(stored),
            Err(e) => {
                warn!(error = %e, "Failed to list blobs during sweep");
                None
            }
        };
        let missing = match &stored {
            Some(stored) => state.drop_missing_blobs(stored),
            None => Vec::new(),
        };
        for entry in &missing {
            warn!(id = %entry.id, location = ?entry.blob_location(), "Dropping entry with missing blob");
        }

        let persisted = self.persist(&state).await;
        self.notify(&state);

        let mut orphans_removed = 0;
        if let (true, Some(stored)) = (persisted, &stored) {
            let referenced = state.referenced_locations();
            for location in stored.difference(&referenced) {
                match self.blob_store.delete(location).await {
                    Ok(()) => orphans_removed += 1,
                    Err(e) => {
                        warn!(location = %location, error = %e, "Failed to delete orphaned blob")
                    }
                }
            }
        }

        let report = SweepReport {
            expired: expired.len(),
            missing_blobs: missing.len(),
            orphans_removed,
        };
        info!(
            expired = report.expired,
            missing_blobs = report.missing_blobs,
            orphans_removed = report.orphans_removed,
            max_age = %max_age,
            "Retention sweep finished"
        );
        report
    }

    /// Persist, release evicted blobs, notify and hand back the new front entry
    async fn commit(&self, state: &HistoryState, outcome: PushOutcome) -> Entry {
        if self.persist(state).await && !outcome.evicted.is_empty() {
            self.release_blobs(&outcome.evicted).await;
        }
        self.notify(state);
        outcome.entry
    }

    async fn release_blobs(&self, entries: &[Entry]) {
        for location in entries.iter().filter_map(Entry::blob_location) {
            if let Err(e) = self.blob_store.delete(location).await {
                warn!(location = %location, error = %e, "Failed to release blob");
            }
        }
    }

    /// Save the record. Blobs are only released after this succeeds, so the
    /// saved record never points at a deleted file.
    async fn persist(&self, state: &HistoryState) -> bool {
        match self.history_store.save(state.entries()).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to persist clipboard history");
                false
            }
        }
    }

    fn notify(&self, state: &HistoryState) {
        self.observer.history_changed(state.entries());
    }

    fn spawn_paste(&self, target: Option<String>) {
        let paster = Arc::clone(&self.paster);
        let delay = self.config.paste_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = paster.paste(target.as_deref()).await {
                debug!(error = %e, "Autopaste failed");
            }
        });
    }
}
