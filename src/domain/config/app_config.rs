//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::history::HISTORY_LIMIT;
use crate::domain::time::Duration;

/// Linux-specific configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinuxConfig {
    pub paste_tool: Option<String>,
    pub clipboard_tool: Option<String>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub history_limit: Option<usize>,
    pub poll_interval: Option<String>,
    pub retention: Option<String>,
    pub sweep_interval: Option<String>,
    pub data_dir: Option<String>,
    pub autopaste: Option<bool>,
    pub linux: Option<LinuxConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            history_limit: Some(HISTORY_LIMIT),
            poll_interval: Some(Duration::default_poll_interval().to_string()),
            retention: Some(Duration::default_retention().to_string()),
            sweep_interval: Some(Duration::default_sweep_interval().to_string()),
            data_dir: None,
            autopaste: Some(false),
            linux: Some(LinuxConfig {
                paste_tool: Some("enigo".to_string()),
                clipboard_tool: Some("arboard".to_string()),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            history_limit: other.history_limit.or(self.history_limit),
            poll_interval: other.poll_interval.or(self.poll_interval),
            retention: other.retention.or(self.retention),
            sweep_interval: other.sweep_interval.or(self.sweep_interval),
            data_dir: other.data_dir.or(self.data_dir),
            autopaste: other.autopaste.or(self.autopaste),
            linux: Self::merge_linux_config(self.linux, other.linux),
        }
    }

    /// Merge Linux config sections
    fn merge_linux_config(
        base: Option<LinuxConfig>,
        other: Option<LinuxConfig>,
    ) -> Option<LinuxConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(LinuxConfig {
                paste_tool: o.paste_tool.or(b.paste_tool),
                clipboard_tool: o.clipboard_tool.or(b.clipboard_tool),
            }),
        }
    }

    /// Get history size cap, or default if not set or zero
    pub fn history_limit_or_default(&self) -> usize {
        self.history_limit
            .filter(|limit| *limit > 0)
            .unwrap_or(HISTORY_LIMIT)
    }

    /// Get poll_interval as parsed Duration, or default if not set/invalid
    pub fn poll_interval_or_default(&self) -> Duration {
        self.poll_interval
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_poll_interval)
    }

    /// Get retention as parsed Duration, or default if not set/invalid
    pub fn retention_or_default(&self) -> Duration {
        self.retention
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_retention)
    }

    /// Get sweep_interval as parsed Duration, or default if not set/invalid
    pub fn sweep_interval_or_default(&self) -> Duration {
        self.sweep_interval
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_sweep_interval)
    }

    /// Get data directory, or the platform data dir if not set
    pub fn data_dir_or_default(&self) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("~/.local/share"))
                    .join("clipmenu")
            })
    }

    /// Get autopaste setting, or false if not set
    pub fn autopaste_or_default(&self) -> bool {
        self.autopaste.unwrap_or(false)
    }

    /// Get paste tool preference, or "enigo" if not set
    pub fn paste_tool_or_default(&self) -> &str {
        self.linux
            .as_ref()
            .and_then(|l| l.paste_tool.as_deref())
            .unwrap_or("enigo")
    }

    /// Get clipboard tool preference, or "arboard" if not set
    pub fn clipboard_tool_or_default(&self) -> &str {
        self.linux
            .as_ref()
            .and_then(|l| l.clipboard_tool.as_deref())
            .unwrap_or("arboard")
    }
}
