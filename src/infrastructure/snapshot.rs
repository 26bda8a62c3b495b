//! History observer publishing snapshots over a `tokio::sync::watch` channel

use tokio::sync::watch;

use crate::application::ports::HistoryObserver;
use crate::domain::history::Entry;

/// Publishes every history change as a fresh snapshot.
///
/// Readers hold a `watch::Receiver` and never touch engine state.
pub struct WatchObserver {
    tx: watch::Sender<Vec<Entry>>,
}

impl WatchObserver {
    /// Create the observer and the receiver readers should clone
    pub fn channel() -> (Self, watch::Receiver<Vec<Entry>>) {
        let (tx, rx) = watch::channel(Vec::new());
        (Self { tx }, rx)
    }
}

impl HistoryObserver for WatchObserver {
    fn history_changed(&self, entries: &[Entry]) {
        self.tx.send_replace(entries.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::history::{EntryId, EntryPayload, Signature};
    use chrono::Utc;

    #[test]
    fn receivers_see_latest_snapshot() {
        let (observer, rx) = WatchObserver::channel();
        assert!(rx.borrow().is_empty());

        let entry = Entry::new(
            EntryId::new(1),
            EntryPayload::Text {
                content: "x".to_string(),
            },
            Signature::for_text("x"),
            Utc::now(),
        );
        observer.history_changed(std::slice::from_ref(&entry));
        observer.history_changed(&[]);
        observer.history_changed(&[entry.clone()]);

        assert_eq!(*rx.borrow(), vec![entry]);
    }
}
