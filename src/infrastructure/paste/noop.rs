//! No-op paste adapter

use async_trait::async_trait;

use crate::application::ports::{PasteError, Paster};

/// Paste adapter that does nothing
///
/// Used when autopaste is disabled or no paste tool is available.
pub struct NoOpPaster;

impl NoOpPaster {
    /// Create a new no-op paste adapter
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpPaster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Paster for NoOpPaster {
    async fn paste(&self, _target: Option<&str>) -> Result<(), PasteError> {
        Ok(())
    }
}
