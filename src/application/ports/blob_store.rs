//! Blob store port interface

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

/// Blob store errors
#[derive(Debug, Clone, Error)]
pub enum BlobStoreError {
    #[error("Failed to write blob: {0}")]
    WriteFailed(String),

    #[error("Failed to read blob '{location}': {message}")]
    ReadFailed { location: String, message: String },

    #[error("Failed to delete blob '{location}': {message}")]
    DeleteFailed { location: String, message: String },

    #[error("Failed to list blob directory: {0}")]
    ListFailed(String),

    #[error("Invalid blob location: {0}")]
    InvalidLocation(String),
}

/// Reference to a stored blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    /// Content hash of the stored bytes
    pub hash: String,
    /// Store-relative location
    pub location: String,
}

/// Port for image payload storage
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist bytes and return their hash and location.
    ///
    /// Must not return Ok unless the bytes are durably on disk.
    async fn put(&self, bytes: &[u8]) -> Result<BlobRef, BlobStoreError>;

    /// Read the bytes stored at `location`
    async fn read(&self, location: &str) -> Result<Vec<u8>, BlobStoreError>;

    /// Remove the blob at `location`. A missing blob is not an error.
    async fn delete(&self, location: &str) -> Result<(), BlobStoreError>;

    /// Every location currently present in the store
    async fn list_all(&self) -> Result<HashSet<String>, BlobStoreError>;
}

/// Blanket implementation for boxed blob store types
#[async_trait]
impl BlobStore for Box<dyn BlobStore> {
    async fn put(&self, bytes: &[u8]) -> Result<BlobRef, BlobStoreError> {
        self.as_ref().put(bytes).await
    }

    async fn read(&self, location: &str) -> Result<Vec<u8>, BlobStoreError> {
        self.as_ref().read(location).await
    }

    async fn delete(&self, location: &str) -> Result<(), BlobStoreError> {
        self.as_ref().delete(location).await
    }

    async fn list_all(&self) -> Result<HashSet<String>, BlobStoreError> {
        self.as_ref().list_all().await
    }
}
