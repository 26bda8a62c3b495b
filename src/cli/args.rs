//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::history::EntryId;
use crate::domain::time::Duration;

/// ClipMenu - clipboard history manager
#[derive(Parser, Debug)]
#[command(name = "clipmenu")]
#[command(version)]
#[command(about = "Background clipboard history with deduplication, retention and paste-back")]
#[command(long_about = None)]
pub struct Cli {
    /// Run the history daemon (control via: clipmenu daemon status/stop)
    #[arg(long)]
    pub daemon: bool,

    /// Clipboard poll interval (e.g., 800ms, 1s)
    #[arg(long, value_name = "TIME", requires = "daemon")]
    pub poll_interval: Option<String>,

    /// Maximum entry age before the sweep removes it (e.g., 2d, 12h)
    #[arg(long, value_name = "TIME", requires = "daemon")]
    pub retention: Option<String>,

    /// Maximum number of retained entries
    #[arg(long, value_name = "N", requires = "daemon")]
    pub history_limit: Option<usize>,

    /// Directory holding history.json and images/
    #[arg(long, value_name = "DIR", requires = "daemon")]
    pub data_dir: Option<String>,

    /// Paste into the target window after `use`
    #[arg(long, requires = "daemon")]
    pub autopaste: bool,

    /// Paste tool to use (Linux: enigo, none, auto, xdotool, wtype)
    #[arg(long, value_name = "TOOL", requires = "daemon")]
    pub paste_tool: Option<String>,

    /// Clipboard backend (arboard, wl-clipboard)
    #[arg(long, value_name = "TOOL", requires = "daemon")]
    pub clipboard_tool: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List history entries, newest first (default)
    List(ListArgs),
    /// Copy an entry back to the clipboard and move it to the top
    Use {
        /// Entry id as shown by `list`
        id: EntryId,
        /// Window or application to paste into when autopaste is on
        #[arg(short, long, value_name = "WINDOW")]
        target: Option<String>,
    },
    /// Delete one entry
    Delete {
        /// Entry id as shown by `list`
        id: EntryId,
    },
    /// Delete every entry and stored image
    Clear,
    /// Run the retention sweep now
    Sweep,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Send commands to running daemon
    Daemon {
        #[command(subcommand)]
        action: DaemonAction,
    },
}

/// Options for `list`
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only show entries containing this text (case-insensitive)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Show at most N entries
    #[arg(short = 'n', long, value_name = "N")]
    pub limit: Option<usize>,

    /// Print entries as JSON
    #[arg(long)]
    pub json: bool,
}

/// Daemon control actions
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum DaemonAction {
    /// Show daemon status
    Status,
    /// Stop the daemon
    Stop,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Parsed daemon options
#[derive(Debug, Clone)]
pub struct DaemonOptions {
    pub poll_interval: Duration,
    pub retention: Duration,
    pub sweep_interval: Duration,
    pub history_limit: usize,
    pub data_dir: PathBuf,
    pub autopaste: bool,
    pub paste_tool: String,
    pub clipboard_tool: String,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "history_limit",
    "poll_interval",
    "retention",
    "sweep_interval",
    "data_dir",
    "autopaste",
    "linux.paste_tool",
    "linux.clipboard_tool",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
