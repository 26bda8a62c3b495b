//! AppleScript paste adapter for macOS

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{PasteError, Paster};

/// Paste adapter driving System Events through osascript
///
/// Brings the target application to the front before sending cmd+v.
pub struct OsascriptPaster;

impl OsascriptPaster {
    /// Create a new osascript paste adapter
    pub fn new() -> Self {
        Self
    }
}

impl Default for OsascriptPaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the AppleScript source for a paste into `target`
fn script(target: Option<&str>) -> String {
    let keystroke = r#"tell application "System Events" to keystroke "v" using {command down}"#;
    match target {
        Some(app) => format!(
            "tell application \"{}\" to activate\n{}",
            app.replace('\\', "\\\\").replace('"', "\\\""),
            keystroke
        ),
        None => keystroke.to_string(),
    }
}

#[async_trait]
impl Paster for OsascriptPaster {
    async fn paste(&self, target: Option<&str>) -> Result<(), PasteError> {
        let output = Command::new("osascript")
            .args(["-e", &script(target)])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PasteError::ToolNotFound("osascript".to_string())
                } else {
                    PasteError::PasteFailed(e.to_string())
                }
            })?;

        if !output.status.success() {
            let message = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(match target {
                Some(app) => PasteError::ActivateFailed {
                    target: app.to_string(),
                    message,
                },
                None => PasteError::PasteFailed(message),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_without_target_only_pastes() {
        let source = script(None);
        assert!(source.starts_with("tell application \"System Events\""));
        assert!(!source.contains("activate"));
    }

    #[test]
    fn script_activates_target_first() {
        let source = script(Some("TextEdit"));
        assert!(source.starts_with("tell application \"TextEdit\" to activate\n"));
        assert!(source.ends_with("using {command down}"));
    }

    #[test]
    fn target_quotes_are_escaped() {
        let source = script(Some(r#"Evil" to quit"#));
        assert!(source.contains(r#""Evil\" to quit""#));
    }
}
