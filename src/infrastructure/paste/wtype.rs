//! Wtype paste adapter for Wayland support

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::application::ports::{PasteError, Paster};

/// Wtype paste adapter for Wayland
///
/// Wayland has no portable window activation, so the target is ignored.
pub struct WtypePaster;

impl WtypePaster {
    /// Create a new wtype paste adapter
    pub fn new() -> Self {
        Self
    }
}

impl Default for WtypePaster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Paster for WtypePaster {
    async fn paste(&self, target: Option<&str>) -> Result<(), PasteError> {
        if let Some(target) = target {
            debug!(target, "wtype cannot activate windows; pasting into focused window");
        }

        let status = Command::new("wtype")
            .args(["-M", "ctrl", "v", "-m", "ctrl"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PasteError::ToolNotFound("wtype".to_string())
                } else {
                    PasteError::PasteFailed(e.to_string())
                }
            })?;

        if !status.success() {
            return Err(PasteError::PasteFailed(format!(
                "wtype exited with status: {}",
                status
            )));
        }

        Ok(())
    }
}
