//! History observer port interface

use crate::domain::history::Entry;

/// Receives the ordered history after every mutation.
///
/// Called while the engine holds its state lock, so implementations must
/// not block.
pub trait HistoryObserver: Send + Sync {
    fn history_changed(&self, entries: &[Entry]);
}

/// Observer that ignores every change
pub struct NoOpObserver;

impl HistoryObserver for NoOpObserver {
    fn history_changed(&self, _entries: &[Entry]) {}
}
