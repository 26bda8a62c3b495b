//! Wayland clipboard adapter using wl-clipboard (wl-paste / wl-copy)

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::application::ports::{Clipboard, ClipboardError};
use crate::domain::history::Sample;

const PNG_MIME: &str = "image/png";

/// Wayland clipboard adapter using wl-clipboard
pub struct WaylandClipboard;

impl WaylandClipboard {
    /// Create a new Wayland clipboard adapter
    pub fn new() -> Self {
        Self
    }
}

impl Default for WaylandClipboard {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_error(tool: &str, e: std::io::Error) -> ClipboardError {
    if e.kind() == std::io::ErrorKind::NotFound {
        ClipboardError::ToolNotFound(tool.to_string())
    } else {
        ClipboardError::ReadFailed(e.to_string())
    }
}

/// Run wl-paste with `args`. An empty selection yields `None`.
async fn wl_paste(args: &[&str]) -> Result<Option<Vec<u8>>, ClipboardError> {
    let output = Command::new("wl-paste")
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| spawn_error("wl-paste", e))?;

    // wl-paste exits non-zero when the selection is empty
    if !output.status.success() {
        return Ok(None);
    }
    Ok(Some(output.stdout))
}

/// Pick the richest content type we know how to store
fn choose_type(offered: &str) -> Option<&'static str> {
    let types: Vec<&str> = offered.lines().map(str::trim).collect();
    if types
        .iter()
        .any(|t| t.starts_with("text/plain") || *t == "UTF8_STRING" || *t == "STRING")
    {
        Some("text")
    } else if types.contains(&PNG_MIME) {
        Some(PNG_MIME)
    } else {
        None
    }
}

async fn wl_copy(args: &[&str], bytes: &[u8]) -> Result<(), ClipboardError> {
    let mut child = Command::new("wl-copy")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ClipboardError::ToolNotFound("wl-copy".to_string())
            } else {
                ClipboardError::CopyFailed(e.to_string())
            }
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(bytes)
            .await
            .map_err(|e| ClipboardError::CopyFailed(e.to_string()))?;
    }

    let status = child
        .wait()
        .await
        .map_err(|e| ClipboardError::CopyFailed(e.to_string()))?;

    if !status.success() {
        return Err(ClipboardError::CopyFailed(format!(
            "wl-copy exited with status: {}",
            status
        )));
    }

    Ok(())
}

#[async_trait]
impl Clipboard for WaylandClipboard {
    async fn read(&self) -> Result<Option<Sample>, ClipboardError> {
        let Some(offered) = wl_paste(&["--list-types"]).await? else {
            return Ok(None);
        };
        let offered = String::from_utf8_lossy(&offered);

        match choose_type(&offered) {
            Some(PNG_MIME) => {
                let bytes = wl_paste(&["--type", PNG_MIME]).await?;
                Ok(bytes.and_then(Sample::image))
            }
            Some(mime) => {
                let bytes = wl_paste(&["--no-newline", "--type", mime]).await?;
                Ok(bytes.and_then(|b| Sample::text(String::from_utf8_lossy(&b).into_owned())))
            }
            None => Ok(None),
        }
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        wl_copy(&[], text.as_bytes()).await
    }

    async fn write_image(&self, png: &[u8]) -> Result<(), ClipboardError> {
        wl_copy(&["--type", PNG_MIME], png).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_wins_over_image() {
        let offered = "image/png\ntext/plain;charset=utf-8\nUTF8_STRING\n";
        assert_eq!(choose_type(offered), Some("text"));
    }

    #[test]
    fn png_is_chosen_when_no_text() {
        assert_eq!(choose_type("image/png\nimage/bmp\n"), Some(PNG_MIME));
    }

    #[test]
    fn unknown_types_are_ignored() {
        assert_eq!(choose_type("application/x-kde-cutselection\n"), None);
        assert_eq!(choose_type(""), None);
    }
}
