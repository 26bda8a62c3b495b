//! Clipboard port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::history::Sample;

/// Clipboard errors
#[derive(Debug, Clone, Error)]
pub enum ClipboardError {
    #[error("{0} not found. Please install wl-clipboard.")]
    ToolNotFound(String),

    #[error("Clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    #[error("Failed to read clipboard: {0}")]
    ReadFailed(String),

    #[error("Failed to copy to clipboard: {0}")]
    CopyFailed(String),

    #[error("Invalid image data: {0}")]
    InvalidImage(String),
}

/// Port for clipboard operations
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Read and classify the current clipboard content.
    ///
    /// Text takes priority over images. Returns `None` when the clipboard
    /// holds neither non-blank text nor a non-empty image.
    async fn read(&self) -> Result<Option<Sample>, ClipboardError>;

    /// Copy text to the system clipboard.
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;

    /// Copy a PNG-encoded image to the system clipboard.
    async fn write_image(&self, png: &[u8]) -> Result<(), ClipboardError>;
}

/// Blanket implementation for boxed clipboard types
#[async_trait]
impl Clipboard for Box<dyn Clipboard> {
    async fn read(&self) -> Result<Option<Sample>, ClipboardError> {
        self.as_ref().read().await
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.as_ref().write_text(text).await
    }

    async fn write_image(&self, png: &[u8]) -> Result<(), ClipboardError> {
        self.as_ref().write_image(png).await
    }
}
