//! CLI presenter for output formatting

use chrono::{DateTime, Utc};
use colored::*;

use crate::domain::history::{Entry, EntryKind};

/// Preview width used by `list`
pub const PREVIEW_CHARS: usize = 72;

/// Presenter for CLI output formatting
pub struct Presenter;

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print daemon status
    pub fn daemon_status(&self, state: &str) {
        eprintln!("{} Daemon: {}", "●".cyan(), state);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print one history entry as a list row
    pub fn entry_line(&self, entry: &Entry, now: DateTime<Utc>) {
        let age = format_age(entry.captured_at, now);
        let preview = entry.preview(PREVIEW_CHARS);
        let preview = match entry.kind() {
            EntryKind::Text => preview.normal(),
            EntryKind::Image => preview.magenta(),
        };
        println!(
            "{}  {:>8}  {}",
            entry.id.to_string().dimmed(),
            age.cyan(),
            preview
        );
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Compact relative age, e.g. `12s ago`, `3h ago`
pub fn format_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    if secs < 0 {
        return "just now".to_string();
    }

    match secs {
        0..=59 => format!("{}s ago", secs),
        60..=3_599 => format!("{}m ago", secs / 60),
        3_600..=86_399 => format!("{}h ago", secs / 3_600),
        _ => format!("{}d ago", secs / 86_400),
    }
}
