//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces: filesystem
//! storage, system clipboard access, paste automation and config files.

pub mod blob;
pub mod clipboard;
pub mod config;
pub mod history;
pub mod paste;
pub mod snapshot;

// Re-export adapters
pub use blob::FsBlobStore;
pub use clipboard::{create_clipboard, ArboardClipboard, ClipboardTool, WaylandClipboard};
pub use config::XdgConfigStore;
pub use history::JsonHistoryStore;
pub use paste::{create_paster, NoOpPaster, PasteTool, PasteToolPreference};
pub use snapshot::WatchObserver;
