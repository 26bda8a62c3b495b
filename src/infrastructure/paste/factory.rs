//! Paste tool factory with automatic detection

use std::fmt;
use std::str::FromStr;

#[cfg(target_os = "linux")]
use std::env;
#[cfg(target_os = "linux")]
use std::process::Stdio;

#[cfg(target_os = "linux")]
use tokio::process::Command;

use crate::application::ports::{PasteError, Paster};

use super::enigo::EnigoPaster;
use super::noop::NoOpPaster;
#[cfg(target_os = "macos")]
use super::osascript::OsascriptPaster;
#[cfg(target_os = "linux")]
use super::wtype::WtypePaster;
#[cfg(target_os = "linux")]
use super::xdotool::XdotoolPaster;

/// Concrete paste tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteTool {
    /// Cross-platform enigo library
    Enigo,
    /// macOS: osascript / System Events
    Osascript,
    /// Linux: wtype (Wayland native)
    Wtype,
    /// Linux: xdotool (X11)
    Xdotool,
    /// Paste disabled
    None,
}

impl fmt::Display for PasteTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasteTool::Enigo => write!(f, "enigo"),
            PasteTool::Osascript => write!(f, "osascript"),
            PasteTool::Wtype => write!(f, "wtype"),
            PasteTool::Xdotool => write!(f, "xdotool"),
            PasteTool::None => write!(f, "none"),
        }
    }
}

/// User preference for paste tool selection.
///
/// - All platforms support `Enigo` (the default) and `None`.
/// - macOS additionally supports `Osascript`, which can focus a target app.
/// - Linux additionally supports `Auto`, `Xdotool`, and `Wtype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasteToolPreference {
    #[default]
    Enigo,
    None,
    #[cfg(target_os = "macos")]
    Osascript,
    #[cfg(target_os = "linux")]
    Auto,
    #[cfg(target_os = "linux")]
    Xdotool,
    #[cfg(target_os = "linux")]
    Wtype,
}

impl fmt::Display for PasteToolPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasteToolPreference::Enigo => write!(f, "enigo"),
            PasteToolPreference::None => write!(f, "none"),
            #[cfg(target_os = "macos")]
            PasteToolPreference::Osascript => write!(f, "osascript"),
            #[cfg(target_os = "linux")]
            PasteToolPreference::Auto => write!(f, "auto"),
            #[cfg(target_os = "linux")]
            PasteToolPreference::Xdotool => write!(f, "xdotool"),
            #[cfg(target_os = "linux")]
            PasteToolPreference::Wtype => write!(f, "wtype"),
        }
    }
}

/// Valid paste tool names on this platform
#[cfg(target_os = "linux")]
pub const VALID_PASTE_TOOLS: &str = "enigo, none, auto, xdotool, wtype";
#[cfg(target_os = "macos")]
pub const VALID_PASTE_TOOLS: &str = "enigo, none, osascript";
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub const VALID_PASTE_TOOLS: &str = "enigo, none";

/// Error type for parsing paste tool preference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePasteToolError {
    pub value: String,
    pub valid_options: &'static str,
}

impl fmt::Display for ParsePasteToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid paste tool '{}'. Valid options: {}",
            self.value, self.valid_options
        )
    }
}

impl std::error::Error for ParsePasteToolError {}

impl FromStr for PasteToolPreference {
    type Err = ParsePasteToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "enigo" => Ok(PasteToolPreference::Enigo),
            "none" => Ok(PasteToolPreference::None),
            #[cfg(target_os = "macos")]
            "osascript" => Ok(PasteToolPreference::Osascript),
            #[cfg(target_os = "linux")]
            "auto" => Ok(PasteToolPreference::Auto),
            #[cfg(target_os = "linux")]
            "xdotool" => Ok(PasteToolPreference::Xdotool),
            #[cfg(target_os = "linux")]
            "wtype" => Ok(PasteToolPreference::Wtype),
            _ => Err(ParsePasteToolError {
                value: s.to_string(),
                valid_options: VALID_PASTE_TOOLS,
            }),
        }
    }
}

/// Check if a tool binary is available using `which`
#[cfg(target_os = "linux")]
async fn is_tool_available(tool: &str) -> bool {
    Command::new("which")
        .arg(tool)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Detect the best native paste tool on Linux.
///
/// Wayland sessions prefer wtype, X11 sessions prefer xdotool (which can
/// also focus a target window). Falls back to enigo.
#[cfg(target_os = "linux")]
pub async fn detect_paste_tool() -> PasteTool {
    let wayland = env::var_os("WAYLAND_DISPLAY").is_some();

    let order: [(&str, PasteTool); 2] = if wayland {
        [("wtype", PasteTool::Wtype), ("xdotool", PasteTool::Xdotool)]
    } else {
        [("xdotool", PasteTool::Xdotool), ("wtype", PasteTool::Wtype)]
    };

    for (binary, tool) in order {
        if is_tool_available(binary).await {
            return tool;
        }
    }
    PasteTool::Enigo
}

#[cfg(target_os = "linux")]
async fn require(binary: &str, tool: PasteTool) -> Result<PasteTool, PasteError> {
    if is_tool_available(binary).await {
        Ok(tool)
    } else {
        Err(PasteError::ToolNotFound(binary.to_string()))
    }
}

/// Create a paste adapter using the specified preference.
///
/// Returns the adapter and the resolved tool, or an error if the requested
/// tool is not installed.
pub async fn create_paster(
    preference: PasteToolPreference,
) -> Result<(Box<dyn Paster>, PasteTool), PasteError> {
    let tool = match preference {
        PasteToolPreference::Enigo => PasteTool::Enigo,
        PasteToolPreference::None => PasteTool::None,
        #[cfg(target_os = "macos")]
        PasteToolPreference::Osascript => PasteTool::Osascript,
        #[cfg(target_os = "linux")]
        PasteToolPreference::Auto => detect_paste_tool().await,
        #[cfg(target_os = "linux")]
        PasteToolPreference::Xdotool => require("xdotool", PasteTool::Xdotool).await?,
        #[cfg(target_os = "linux")]
        PasteToolPreference::Wtype => require("wtype", PasteTool::Wtype).await?,
    };

    Ok((adapter_for(tool)?, tool))
}

fn adapter_for(tool: PasteTool) -> Result<Box<dyn Paster>, PasteError> {
    match tool {
        PasteTool::Enigo => Ok(Box::new(EnigoPaster::new())),
        PasteTool::None => Ok(Box::new(NoOpPaster::new())),
        #[cfg(target_os = "macos")]
        PasteTool::Osascript => Ok(Box::new(OsascriptPaster::new())),
        #[cfg(target_os = "linux")]
        PasteTool::Wtype => Ok(Box::new(WtypePaster::new())),
        #[cfg(target_os = "linux")]
        PasteTool::Xdotool => Ok(Box::new(XdotoolPaster::new())),
        #[allow(unreachable_patterns)]
        other => Err(PasteError::ToolNotFound(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paste_tool_display() {
        assert_eq!(PasteTool::Enigo.to_string(), "enigo");
        assert_eq!(PasteTool::Osascript.to_string(), "osascript");
        assert_eq!(PasteTool::Wtype.to_string(), "wtype");
        assert_eq!(PasteTool::Xdotool.to_string(), "xdotool");
        assert_eq!(PasteTool::None.to_string(), "none");
    }

    #[test]
    fn preference_from_str_is_case_insensitive() {
        assert_eq!(
            "ENIGO".parse::<PasteToolPreference>().unwrap(),
            PasteToolPreference::Enigo
        );
        assert_eq!(
            "none".parse::<PasteToolPreference>().unwrap(),
            PasteToolPreference::None
        );
        #[cfg(target_os = "linux")]
        {
            assert_eq!(
                "auto".parse::<PasteToolPreference>().unwrap(),
                PasteToolPreference::Auto
            );
            assert_eq!(
                "xdotool".parse::<PasteToolPreference>().unwrap(),
                PasteToolPreference::Xdotool
            );
            assert_eq!(
                "Wtype".parse::<PasteToolPreference>().unwrap(),
                PasteToolPreference::Wtype
            );
        }
    }

    #[test]
    fn preference_from_str_invalid() {
        let err = "ydotool".parse::<PasteToolPreference>().unwrap_err();
        assert_eq!(err.value, "ydotool");
        assert_eq!(err.valid_options, VALID_PASTE_TOOLS);
    }

    #[test]
    fn preference_display_round_trips() {
        let pref = PasteToolPreference::default();
        assert_eq!(pref, PasteToolPreference::Enigo);
        assert_eq!(pref.to_string().parse::<PasteToolPreference>().unwrap(), pref);
    }

    #[tokio::test]
    async fn none_preference_yields_noop() {
        let (paster, tool) = create_paster(PasteToolPreference::None).await.unwrap();
        assert_eq!(tool, PasteTool::None);
        assert!(paster.paste(Some("anything")).await.is_ok());
    }
}
