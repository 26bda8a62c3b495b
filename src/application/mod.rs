//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod history;
pub mod ports;

// Re-export use cases
pub use history::{
    ClipboardHistoryUseCase, HistoryConfig, HistoryError, IngestOutcome, SweepReport,
    DEFAULT_PASTE_DELAY_MS,
};
