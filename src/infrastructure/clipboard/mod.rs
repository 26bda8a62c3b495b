//! Clipboard infrastructure module
//!
//! Provides cross-platform clipboard support using arboard (primary)
//! or wl-clipboard on Wayland sessions.

mod arboard;
mod wayland;

pub use arboard::ArboardClipboard;
pub use wayland::WaylandClipboard;

use std::fmt;
use std::str::FromStr;

use crate::application::ports::Clipboard;

/// Available clipboard backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipboardTool {
    #[default]
    Arboard,
    WlClipboard,
}

impl ClipboardTool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arboard => "arboard",
            Self::WlClipboard => "wl-clipboard",
        }
    }
}

impl fmt::Display for ClipboardTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClipboardTool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "arboard" => Ok(Self::Arboard),
            "wl-clipboard" | "wayland" => Ok(Self::WlClipboard),
            _ => Err(format!(
                "Unknown clipboard tool: '{}'. Valid options: arboard, wl-clipboard",
                s
            )),
        }
    }
}

/// Create the clipboard adapter for the chosen backend
pub fn create_clipboard(tool: ClipboardTool) -> Box<dyn Clipboard> {
    match tool {
        ClipboardTool::Arboard => Box::new(ArboardClipboard::new()),
        ClipboardTool::WlClipboard => Box::new(WaylandClipboard::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tool_names() {
        assert_eq!("arboard".parse::<ClipboardTool>(), Ok(ClipboardTool::Arboard));
        assert_eq!(
            "Wayland".parse::<ClipboardTool>(),
            Ok(ClipboardTool::WlClipboard)
        );
        assert!("xclip".parse::<ClipboardTool>().is_err());
    }

    #[test]
    fn display_round_trips() {
        let tool = ClipboardTool::WlClipboard;
        assert_eq!(tool.to_string().parse::<ClipboardTool>(), Ok(tool));
    }
}
