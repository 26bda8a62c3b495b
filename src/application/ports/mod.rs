//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod blob_store;
pub mod clipboard;
pub mod config;
pub mod history_store;
pub mod observer;
pub mod paster;

// Re-export common types
pub use blob_store::{BlobRef, BlobStore, BlobStoreError};
pub use clipboard::{Clipboard, ClipboardError};
pub use config::ConfigStore;
pub use history_store::{HistoryStore, HistoryStoreError};
pub use observer::{HistoryObserver, NoOpObserver};
pub use paster::{PasteError, Paster};
