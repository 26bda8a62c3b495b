//! History engine tests against the filesystem stores

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use tempfile::TempDir;

use clipmenu::application::ports::{Clipboard, ClipboardError, NoOpObserver};
use clipmenu::application::{ClipboardHistoryUseCase, HistoryConfig, IngestOutcome};
use clipmenu::domain::history::{content_hash, EntryId, EntryKind, Sample};
use clipmenu::domain::time::Duration;
use clipmenu::infrastructure::{FsBlobStore, JsonHistoryStore, NoOpPaster};

#[derive(Clone, Default)]
struct FakeClipboard {
    written: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Clipboard for FakeClipboard {
    async fn read(&self) -> Result<Option<Sample>, ClipboardError> {
        Ok(None)
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.written.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn write_image(&self, png: &[u8]) -> Result<(), ClipboardError> {
        self.written
            .lock()
            .unwrap()
            .push(format!("image:{}", png.len()));
        Ok(())
    }
}

type Engine =
    ClipboardHistoryUseCase<FsBlobStore, JsonHistoryStore, FakeClipboard, NoOpPaster, NoOpObserver>;

struct DataDir {
    dir: TempDir,
}

impl DataDir {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn images(&self) -> PathBuf {
        self.dir.path().join("images")
    }

    fn record(&self) -> PathBuf {
        self.dir.path().join("history.json")
    }

    fn engine(&self, history_limit: usize) -> Engine {
        self.engine_with(history_limit, FakeClipboard::default())
    }

    fn engine_with(&self, history_limit: usize, clipboard: FakeClipboard) -> Engine {
        ClipboardHistoryUseCase::new(
            FsBlobStore::new(self.images()),
            JsonHistoryStore::new(self.record()),
            clipboard,
            NoOpPaster,
            NoOpObserver,
            HistoryConfig {
                history_limit,
                ..HistoryConfig::default()
            },
        )
    }

    fn blob_files(&self) -> HashSet<String> {
        list_files(&self.images())
    }
}

fn list_files(dir: &Path) -> HashSet<String> {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect(),
        Err(_) => HashSet::new(),
    }
}

fn text(s: &str) -> Sample {
    Sample::text(s).unwrap()
}

fn image(bytes: &[u8]) -> Sample {
    Sample::image(bytes.to_vec()).unwrap()
}

fn contents(entries: &[clipmenu::domain::history::Entry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| match e.text() {
            Some(t) => t.to_string(),
            None => e.blob_location().unwrap_or_default().to_string(),
        })
        .collect()
}

async fn referenced(engine: &Engine) -> HashSet<String> {
    engine
        .snapshot()
        .await
        .iter()
        .filter_map(|e| e.blob_location().map(str::to_string))
        .collect()
}

#[tokio::test]
async fn history_survives_restart() {
    let data = DataDir::new();

    let engine = data.engine(10);
    engine.ingest(text("alpha")).await.unwrap();
    engine.ingest(image(b"png-one")).await.unwrap();
    engine.ingest(text("beta")).await.unwrap();
    let before = engine.snapshot().await;
    drop(engine);

    let restarted = data.engine(10);
    assert_eq!(restarted.restore().await, 3);
    assert_eq!(restarted.snapshot().await, before);

    let added = restarted.ingest(text("gamma")).await.unwrap();
    let IngestOutcome::Added(entry) = added else {
        panic!("expected gamma to be added");
    };
    let max_before = before.iter().map(|e| e.id).max().unwrap();
    assert!(entry.id > max_before);
}

#[tokio::test]
async fn consecutive_duplicates_are_skipped() {
    let data = DataDir::new();
    let engine = data.engine(10);

    engine.ingest(text("same")).await.unwrap();
    assert_eq!(
        engine.ingest(text("same")).await.unwrap(),
        IngestOutcome::Skipped
    );
    assert_eq!(engine.len().await, 1);
}

#[tokio::test]
async fn recopy_moves_entry_to_front() {
    let data = DataDir::new();
    let engine = data.engine(10);

    engine.ingest(text("A")).await.unwrap();
    engine.ingest(text("B")).await.unwrap();
    engine.ingest(text("A")).await.unwrap();

    assert_eq!(contents(&engine.snapshot().await), ["A", "B"]);
}

#[tokio::test]
async fn cap_evicts_oldest_and_its_blob() {
    let data = DataDir::new();
    let engine = data.engine(2);

    engine.ingest(image(b"first")).await.unwrap();
    engine.ingest(text("second")).await.unwrap();
    engine.ingest(text("third")).await.unwrap();

    let entries = engine.snapshot().await;
    assert_eq!(contents(&entries), ["third", "second"]);
    assert!(data.blob_files().is_empty());
}

#[tokio::test]
async fn identical_images_share_one_blob() {
    let data = DataDir::new();
    let engine = data.engine(10);

    engine.ingest(image(b"shared")).await.unwrap();
    engine.ingest(text("between")).await.unwrap();
    engine.ingest(image(b"shared")).await.unwrap();

    let entries = engine.snapshot().await;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].kind(), EntryKind::Image);

    let expected = format!("{}.png", content_hash(b"shared"));
    assert_eq!(data.blob_files(), HashSet::from([expected]));
}

#[tokio::test]
async fn sweep_expires_old_entries_and_orphans() {
    let data = DataDir::new();
    fs::create_dir_all(data.images()).unwrap();

    let old_hash = content_hash(b"old");
    let fresh_hash = content_hash(b"fresh");
    fs::write(data.images().join(format!("{}.png", old_hash)), b"old").unwrap();
    fs::write(data.images().join(format!("{}.png", fresh_hash)), b"fresh").unwrap();
    fs::write(data.images().join("leftover.png"), b"orphan").unwrap();

    let old = (Utc::now() - ChronoDuration::days(10)).to_rfc3339();
    let fresh = Utc::now().to_rfc3339();
    fs::write(
        data.record(),
        format!(
            r#"{{"version":1,"entries":[
                {{"id":3,"kind":"image","hash":"{fresh_hash}","location":"{fresh_hash}.png","signature":"{fresh_hash}","captured_at":"{fresh}"}},
                {{"id":2,"kind":"text","content":"stale","signature":"text:stale","captured_at":"{old}"}},
                {{"id":1,"kind":"image","hash":"{old_hash}","location":"{old_hash}.png","signature":"{old_hash}","captured_at":"{old}"}}
            ]}}"#
        ),
    )
    .unwrap();

    let engine = data.engine(10);
    assert_eq!(engine.restore().await, 3);

    let report = engine.sweep(Duration::from_days(7)).await;
    assert_eq!(report.expired, 2);
    assert_eq!(report.orphans_removed, 2);

    let entries = engine.snapshot().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, EntryId::new(3));
    assert_eq!(data.blob_files(), referenced(&engine).await);

    let reloaded = data.engine(10);
    assert_eq!(reloaded.restore().await, 1);
}

#[tokio::test]
async fn clear_empties_blob_directory() {
    let data = DataDir::new();
    let engine = data.engine(10);

    engine.ingest(image(b"one")).await.unwrap();
    engine.ingest(image(b"two")).await.unwrap();
    fs::write(data.images().join("stray.png"), b"stray").unwrap();

    assert_eq!(engine.clear().await, 2);
    assert!(engine.is_empty().await);
    assert!(data.blob_files().is_empty());

    let reloaded = data.engine(10);
    assert_eq!(reloaded.restore().await, 0);
}

#[tokio::test]
async fn delete_removes_entry_and_blob() {
    let data = DataDir::new();
    let engine = data.engine(10);

    let IngestOutcome::Added(img) = engine.ingest(image(b"gone")).await.unwrap() else {
        panic!("expected image to be added");
    };
    engine.ingest(text("kept")).await.unwrap();

    assert!(engine.delete(img.id).await);
    assert!(!engine.delete(img.id).await);
    assert!(data.blob_files().is_empty());
    assert_eq!(contents(&engine.snapshot().await), ["kept"]);
}

#[tokio::test]
async fn use_entry_writes_clipboard_and_promotes() {
    let data = DataDir::new();
    let clipboard = FakeClipboard::default();
    let engine = data.engine_with(10, clipboard.clone());

    let IngestOutcome::Added(first) = engine.ingest(text("first")).await.unwrap() else {
        panic!("expected first to be added");
    };
    engine.ingest(image(b"picture")).await.unwrap();

    let promoted = engine.use_entry(first.id, None).await.unwrap().unwrap();
    assert!(promoted.id > first.id);
    assert_eq!(contents(&engine.snapshot().await)[0], "first");
    assert_eq!(*clipboard.written.lock().unwrap(), ["first"]);

    // Copying it back does not produce a new entry
    assert_eq!(
        engine.ingest(text("first")).await.unwrap(),
        IngestOutcome::Skipped
    );

    assert!(engine
        .use_entry(EntryId::new(999), None)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn malformed_record_starts_empty() {
    let data = DataDir::new();
    fs::write(data.record(), "{ not json").unwrap();

    let engine = data.engine(10);
    assert_eq!(engine.restore().await, 0);

    engine.ingest(text("fresh start")).await.unwrap();
    let saved = fs::read_to_string(data.record()).unwrap();
    assert!(saved.contains("fresh start"));
}

#[tokio::test]
async fn restore_trims_to_limit() {
    let data = DataDir::new();

    let engine = data.engine(10);
    for word in ["one", "two", "three", "four"] {
        engine.ingest(text(word)).await.unwrap();
    }
    drop(engine);

    let smaller = data.engine(2);
    assert_eq!(smaller.restore().await, 2);
    assert_eq!(contents(&smaller.snapshot().await), ["four", "three"]);
}

#[tokio::test]
async fn sweep_drops_entry_whose_blob_is_gone() {
    let data = DataDir::new();
    let hash = content_hash(b"vanished");
    let now = Utc::now().to_rfc3339();
    fs::write(
        data.record(),
        format!(
            r#"{{"version":1,"entries":[
                {{"id":2,"kind":"text","content":"still here","signature":"text:still here","captured_at":"{now}"}},
                {{"id":1,"kind":"image","hash":"{hash}","location":"{hash}.png","signature":"{hash}","captured_at":"{now}"}}
            ]}}"#
        ),
    )
    .unwrap();

    let engine = data.engine(10);
    assert_eq!(engine.restore().await, 2);

    let report = engine.sweep(Duration::from_days(2)).await;
    assert_eq!(report.missing_blobs, 1);
    assert_eq!(contents(&engine.snapshot().await), ["still here"]);
    assert!(data.blob_files().is_empty());

    let reloaded = data.engine(10);
    assert_eq!(reloaded.restore().await, 1);
    assert!(referenced(&reloaded).await.is_empty());
}
