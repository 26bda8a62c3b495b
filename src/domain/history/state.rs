//! History state machine
//!
//! The single owned aggregate behind the engine: the ordered entry list
//! (newest first) plus the last ingested signature.
//!
//! Invariants after every mutation:
//!   - no two entries share a signature
//!   - `len() <= limit`
//!   - ids are unique and strictly increasing in creation order

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::entry::{Entry, EntryId, EntryPayload, Signature};

/// Default history size cap
pub const HISTORY_LIMIT: usize = 100;

/// Result of inserting an entry at the front
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    /// The entry now at the front
    pub entry: Entry,
    /// Tail entries dropped to honor the size cap
    pub evicted: Vec<Entry>,
}

#[derive(Debug, Clone)]
pub struct HistoryState {
    entries: Vec<Entry>,
    last_signature: Option<Signature>,
    last_id: u64,
    limit: usize,
}

impl HistoryState {
    /// Create an empty history with the given size cap (at least 1)
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            last_signature: None,
            last_id: 0,
            limit: limit.max(1),
        }
    }

    /// Rebuild state from persisted entries.
    ///
    /// Later duplicates of a signature and entries past the cap are dropped
    /// and returned so their blobs can be released.
    pub fn restore(entries: Vec<Entry>, limit: usize) -> (Self, Vec<Entry>) {
        let mut state = Self::new(limit);
        let mut seen = HashSet::new();
        let mut dropped = Vec::new();

        for entry in entries {
            state.last_id = state.last_id.max(entry.id.value());
            if state.entries.len() < state.limit && seen.insert(entry.signature.clone()) {
                state.entries.push(entry);
            } else {
                dropped.push(entry);
            }
        }

        // A dropped duplicate may share its blob with a kept entry
        let kept = state.referenced_locations();
        dropped.retain(|e| !e.blob_location().is_some_and(|loc| kept.contains(loc)));

        (state, dropped)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Owned copy of the ordered entries
    pub fn snapshot(&self) -> Vec<Entry> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn last_signature(&self) -> Option<&Signature> {
        self.last_signature.as_ref()
    }

    /// True when `signature` was the most recently ingested one
    pub fn is_repeat(&self, signature: &Signature) -> bool {
        self.last_signature.as_ref() == Some(signature)
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn next_id(&mut self, now: DateTime<Utc>) -> EntryId {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        self.last_id = millis.max(self.last_id + 1);
        EntryId::new(self.last_id)
    }

    /// Insert new content at the front.
    ///
    /// Any entry with the same signature is removed first. Does not consult
    /// `last_signature`; callers decide whether a repeat should be skipped.
    pub fn push(
        &mut self,
        payload: EntryPayload,
        signature: Signature,
        now: DateTime<Utc>,
    ) -> PushOutcome {
        self.entries.retain(|e| e.signature != signature);

        let id = self.next_id(now);
        let entry = Entry::new(id, payload, signature.clone(), now);
        self.entries.insert(0, entry.clone());
        self.last_signature = Some(signature);

        let evicted = if self.entries.len() > self.limit {
            self.entries.split_off(self.limit)
        } else {
            Vec::new()
        };

        PushOutcome { entry, evicted }
    }

    /// Move an existing entry to the front with a fresh id and timestamp
    pub fn promote(&mut self, id: EntryId, now: DateTime<Utc>) -> Option<PushOutcome> {
        let existing = self.get(id)?.clone();
        Some(self.push(existing.payload, existing.signature, now))
    }

    /// Remove an entry by id
    pub fn remove(&mut self, id: EntryId) -> Option<Entry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Drop every entry. `last_signature` is kept so the content still on
    /// the clipboard is not re-ingested on the next tick.
    pub fn clear(&mut self) -> Vec<Entry> {
        std::mem::take(&mut self.entries)
    }

    /// Drop entries captured at or before `cutoff`
    pub fn expire_before(&mut self, cutoff: DateTime<Utc>) -> Vec<Entry> {
        let (fresh, expired): (Vec<Entry>, Vec<Entry>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| e.captured_at > cutoff);
        self.entries = fresh;
        expired
    }

    /// Drop image entries whose blob is not among `stored`
    pub fn drop_missing_blobs(&mut self, stored: &HashSet<String>) -> Vec<Entry> {
        let (kept, missing): (Vec<Entry>, Vec<Entry>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| e.blob_location().map_or(true, |loc| stored.contains(loc)));
        self.entries = kept;
        missing
    }

    /// Blob locations referenced by surviving image entries
    pub fn referenced_locations(&self) -> HashSet<String> {
        self.entries
            .iter()
            .filter_map(|e| e.blob_location().map(str::to_string))
            .collect()
    }
}

impl Default for HistoryState {
    fn default() -> Self {
        Self::new(HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn text(content: &str) -> (EntryPayload, Signature) {
        (
            EntryPayload::Text {
                content: content.to_string(),
            },
            Signature::for_text(content),
        )
    }

    fn image(hash: &str) -> (EntryPayload, Signature) {
        (
            EntryPayload::Image {
                hash: hash.to_string(),
                location: format!("{}.png", hash),
            },
            Signature::for_image(hash),
        )
    }

    fn push_text(state: &mut HistoryState, content: &str, now: DateTime<Utc>) -> PushOutcome {
        let (payload, sig) = text(content);
        state.push(payload, sig, now)
    }

    fn contents(state: &HistoryState) -> Vec<&str> {
        state.entries().iter().filter_map(|e| e.text()).collect()
    }

    #[test]
    fn new_state_is_empty() {
        let state = HistoryState::default();
        assert!(state.is_empty());
        assert_eq!(state.limit(), HISTORY_LIMIT);
        assert!(state.last_signature().is_none());
    }

    #[test]
    fn push_prepends_newest_first() {
        let mut state = HistoryState::new(10);
        let now = Utc::now();
        push_text(&mut state, "a", now);
        push_text(&mut state, "b", now);
        assert_eq!(contents(&state), vec!["b", "a"]);
        assert!(state.is_repeat(&Signature::for_text("b")));
    }

    #[test]
    fn repush_moves_to_front_without_duplicate() {
        let mut state = HistoryState::new(10);
        let now = Utc::now();
        push_text(&mut state, "a", now);
        push_text(&mut state, "b", now);
        push_text(&mut state, "a", now);
        assert_eq!(contents(&state), vec!["a", "b"]);
    }

    #[test]
    fn ids_are_unique_within_same_millisecond() {
        let mut state = HistoryState::new(10);
        let now = Utc::now();
        let first = push_text(&mut state, "a", now).entry.id;
        let second = push_text(&mut state, "b", now).entry.id;
        let third = push_text(&mut state, "a", now).entry.id;
        assert!(first < second);
        assert!(second < third);
    }

    #[test]
    fn cap_evicts_oldest_tail() {
        let mut state = HistoryState::new(3);
        let now = Utc::now();
        for c in ["a", "b", "c"] {
            assert!(push_text(&mut state, c, now).evicted.is_empty());
        }
        let outcome = push_text(&mut state, "d", now);
        assert_eq!(outcome.evicted.len(), 1);
        assert_eq!(outcome.evicted[0].text(), Some("a"));
        assert_eq!(contents(&state), vec!["d", "c", "b"]);
    }

    #[test]
    fn len_never_exceeds_limit_and_signatures_stay_unique() {
        let mut state = HistoryState::new(5);
        let now = Utc::now();
        for i in 0..50 {
            let content = format!("item-{}", i % 7);
            push_text(&mut state, &content, now);
            assert!(state.len() <= 5);
            let sigs: HashSet<_> = state.entries().iter().map(|e| &e.signature).collect();
            assert_eq!(sigs.len(), state.len());
        }
    }

    #[test]
    fn promote_moves_entry_to_front_with_new_id() {
        let mut state = HistoryState::new(10);
        let now = Utc::now();
        let a = push_text(&mut state, "a", now).entry;
        push_text(&mut state, "b", now);

        let later = now + Duration::seconds(5);
        let promoted = state.promote(a.id, later).unwrap().entry;
        assert_eq!(contents(&state), vec!["a", "b"]);
        assert!(promoted.id > a.id);
        assert_eq!(promoted.captured_at, later);
        assert!(state.get(a.id).is_none());
        assert!(state.is_repeat(&Signature::for_text("a")));
    }

    #[test]
    fn promote_unknown_id_is_none() {
        let mut state = HistoryState::new(10);
        assert!(state.promote(EntryId::new(99), Utc::now()).is_none());
    }

    #[test]
    fn remove_by_id() {
        let mut state = HistoryState::new(10);
        let a = push_text(&mut state, "a", Utc::now()).entry;
        assert_eq!(state.remove(a.id).map(|e| e.id), Some(a.id));
        assert!(state.remove(a.id).is_none());
        assert!(state.is_empty());
    }

    #[test]
    fn clear_keeps_last_signature() {
        let mut state = HistoryState::new(10);
        push_text(&mut state, "a", Utc::now());
        let removed = state.clear();
        assert_eq!(removed.len(), 1);
        assert!(state.is_empty());
        assert!(state.is_repeat(&Signature::for_text("a")));
    }

    #[test]
    fn drop_missing_blobs_keeps_text_and_stored_images() {
        let mut state = HistoryState::new(10);
        let now = Utc::now();
        let (payload, sig) = image("gone");
        state.push(payload, sig, now);
        let (payload, sig) = image("kept");
        state.push(payload, sig, now);
        push_text(&mut state, "note", now);

        let stored = HashSet::from(["kept.png".to_string()]);
        let missing = state.drop_missing_blobs(&stored);

        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].blob_location(), Some("gone.png"));
        assert_eq!(state.len(), 2);
        assert_eq!(state.referenced_locations(), stored);
    }

    #[test]
    fn expire_before_drops_old_entries() {
        let mut state = HistoryState::new(10);
        let now = Utc::now();
        let (payload, sig) = image("old");
        state.push(payload, sig, now - Duration::days(3));
        push_text(&mut state, "fresh", now);

        let expired = state.expire_before(now - Duration::days(2));
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].blob_location(), Some("old.png"));
        assert_eq!(contents(&state), vec!["fresh"]);
        assert!(state.referenced_locations().is_empty());
    }

    #[test]
    fn referenced_locations_lists_images() {
        let mut state = HistoryState::new(10);
        let now = Utc::now();
        let (payload, sig) = image("abc");
        state.push(payload, sig, now);
        push_text(&mut state, "t", now);
        let locations = state.referenced_locations();
        assert_eq!(locations.len(), 1);
        assert!(locations.contains("abc.png"));
    }

    #[test]
    fn restore_dedups_caps_and_tracks_ids() {
        let now = Utc::now();
        let mk = |id: u64, content: &str| {
            let (payload, sig) = text(content);
            Entry::new(EntryId::new(id), payload, sig, now)
        };
        let persisted = vec![mk(30, "c"), mk(20, "b"), mk(15, "c"), mk(10, "a")];

        let (mut state, dropped) = HistoryState::restore(persisted, 2);
        assert_eq!(contents(&state), vec!["c", "b"]);
        assert_eq!(dropped.len(), 2);
        assert!(state.last_signature().is_none());

        let next = push_text(&mut state, "d", DateTime::<Utc>::UNIX_EPOCH).entry;
        assert_eq!(next.id, EntryId::new(31));
    }
}
