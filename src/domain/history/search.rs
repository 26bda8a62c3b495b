//! History search
//!
//! Case-insensitive substring filter over a snapshot. Image entries have no
//! searchable text and match only the `[image]` label.

use super::entry::{Entry, EntryPayload, IMAGE_LABEL};

/// Filter entries whose content contains `query` (case-insensitive).
/// An empty query returns every entry, order preserved.
pub fn filter<'a>(entries: &'a [Entry], query: &str) -> Vec<&'a Entry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return entries.iter().collect();
    }

    entries
        .iter()
        .filter(|entry| match &entry.payload {
            EntryPayload::Text { content } => content.to_lowercase().contains(&needle),
            EntryPayload::Image { .. } => IMAGE_LABEL.contains(&needle),
        })
        .collect()
}
