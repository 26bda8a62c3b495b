//! Clipboard history domain module

mod entry;
pub mod search;
mod state;

pub use entry::{content_hash, Entry, EntryId, EntryKind, EntryPayload, Sample, Signature};
pub use state::{HistoryState, PushOutcome, HISTORY_LIMIT};
