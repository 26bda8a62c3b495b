//! Xdotool paste adapter for X11 support

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{PasteError, Paster};

/// Xdotool paste adapter
///
/// Activates the first window whose name matches the target, then sends
/// ctrl+v with modifiers cleared.
pub struct XdotoolPaster;

impl XdotoolPaster {
    /// Create a new xdotool paste adapter
    pub fn new() -> Self {
        Self
    }
}

impl Default for XdotoolPaster {
    fn default() -> Self {
        Self::new()
    }
}

async fn xdotool(args: &[&str]) -> Result<std::process::ExitStatus, PasteError> {
    Command::new("xdotool")
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PasteError::ToolNotFound("xdotool".to_string())
            } else {
                PasteError::PasteFailed(e.to_string())
            }
        })
}

#[async_trait]
impl Paster for XdotoolPaster {
    async fn paste(&self, target: Option<&str>) -> Result<(), PasteError> {
        if let Some(target) = target {
            let status = xdotool(&[
                "search",
                "--limit",
                "1",
                "--name",
                target,
                "windowactivate",
                "--sync",
            ])
            .await?;

            if !status.success() {
                return Err(PasteError::ActivateFailed {
                    target: target.to_string(),
                    message: format!("xdotool exited with status: {}", status),
                });
            }
        }

        let status = xdotool(&["key", "--clearmodifiers", "ctrl+v"]).await?;
        if !status.success() {
            return Err(PasteError::PasteFailed(format!(
                "xdotool exited with status: {}",
                status
            )));
        }

        Ok(())
    }
}
