//! ClipMenu - background clipboard history manager
//!
//! Samples the system clipboard, keeps a bounded, de-duplicated,
//! time-limited history of text and image entries, persists it across
//! restarts, and can copy any entry back (optionally pasting it).
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Entries, the history state machine, durations, config and errors
//! - **Application**: The history use case and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (filesystem stores, clipboard, paste tools)
//! - **CLI**: Argument parsing, the daemon loop, IPC and signal handling (Unix only)

pub mod application;
#[cfg(unix)]
pub mod cli;
pub mod domain;
pub mod infrastructure;
