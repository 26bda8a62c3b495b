//! Paste automation port interface

use async_trait::async_trait;
use thiserror::Error;

/// Paste automation errors
#[derive(Debug, Clone, Error)]
pub enum PasteError {
    #[error("{0} not found. Please install it or choose another paste tool.")]
    ToolNotFound(String),

    #[error("No paste tool available")]
    NoToolAvailable,

    #[error("Failed to activate target '{target}': {message}")]
    ActivateFailed { target: String, message: String },

    #[error("Failed to send paste keystroke: {0}")]
    PasteFailed(String),
}

/// Port for pasting the clipboard into another application
#[async_trait]
pub trait Paster: Send + Sync {
    /// Optionally focus `target`, then send the platform paste chord.
    ///
    /// Adapters that cannot activate windows ignore `target` and paste into
    /// whatever currently has focus.
    async fn paste(&self, target: Option<&str>) -> Result<(), PasteError>;
}

/// Blanket implementation for boxed paster types
#[async_trait]
impl Paster for Box<dyn Paster> {
    async fn paste(&self, target: Option<&str>) -> Result<(), PasteError> {
        self.as_ref().paste(target).await
    }
}
