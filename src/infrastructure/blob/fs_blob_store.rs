//! Content-addressed image storage on the local filesystem
//!
//! Layout: `<dir>/<sha256>.png`. Identical bytes always map to the same
//! file, so a repeated image costs nothing on disk.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::application::ports::{BlobRef, BlobStore, BlobStoreError};
use crate::domain::history::content_hash;

const BLOB_EXTENSION: &str = "png";

/// Filesystem blob store
pub struct FsBlobStore {
    dir: PathBuf,
}

impl FsBlobStore {
    /// Store blobs under `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a location to a path, rejecting anything outside the store
    fn resolve(&self, location: &str) -> Result<PathBuf, BlobStoreError> {
        let valid = !location.is_empty()
            && !location.starts_with('.')
            && !location.contains(['/', '\\'])
            && location.ends_with(&format!(".{}", BLOB_EXTENSION));

        if valid {
            Ok(self.dir.join(location))
        } else {
            Err(BlobStoreError::InvalidLocation(location.to_string()))
        }
    }

    async fn write_atomically(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let tmp = self.dir.join(format!(".{}.tmp", file_name));

        let mut file = fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);

        if let Err(e) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, bytes: &[u8]) -> Result<BlobRef, BlobStoreError> {
        let hash = content_hash(bytes);
        let location = format!("{}.{}", hash, BLOB_EXTENSION);
        let path = self.dir.join(&location);

        if fs::try_exists(&path).await.unwrap_or(false) {
            debug!(hash = %hash, "Blob already exists, skipping write");
            return Ok(BlobRef { hash, location });
        }

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| BlobStoreError::WriteFailed(e.to_string()))?;

        self.write_atomically(&path, bytes)
            .await
            .map_err(|e| BlobStoreError::WriteFailed(format!("{}: {}", path.display(), e)))?;

        debug!(hash = %hash, size = bytes.len(), "Stored new blob");
        Ok(BlobRef { hash, location })
    }

    async fn read(&self, location: &str) -> Result<Vec<u8>, BlobStoreError> {
        let path = self.resolve(location)?;
        fs::read(&path)
            .await
            .map_err(|e| BlobStoreError::ReadFailed {
                location: location.to_string(),
                message: e.to_string(),
            })
    }

    async fn delete(&self, location: &str) -> Result<(), BlobStoreError> {
        let path = self.resolve(location)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(location, "Deleted blob file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BlobStoreError::DeleteFailed {
                location: location.to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn list_all(&self) -> Result<HashSet<String>, BlobStoreError> {
        let mut dir = match fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashSet::new()),
            Err(e) => return Err(BlobStoreError::ListFailed(e.to_string())),
        };

        let mut locations = HashSet::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| BlobStoreError::ListFailed(e.to_string()))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if self.resolve(&name).is_ok() {
                locations.insert(name);
            }
        }
        Ok(locations)
    }
}
