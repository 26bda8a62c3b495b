//! Domain layer - Core business logic
//!
//! Contains value objects, the history state machine, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod history;
pub mod time;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use history::{
    content_hash, Entry, EntryId, EntryKind, EntryPayload, HistoryState, PushOutcome, Sample,
    Signature, HISTORY_LIMIT,
};
pub use time::Duration;
