//! Paste infrastructure module
//!
//! Provides cross-platform paste automation using enigo (primary)
//! or platform-specific tools that can also focus a target window.

mod enigo;
mod factory;
mod noop;
mod osascript;
mod wtype;
mod xdotool;

pub use enigo::EnigoPaster;
pub use factory::{
    create_paster, PasteTool, PasteToolPreference, ParsePasteToolError, VALID_PASTE_TOOLS,
};
#[cfg(target_os = "linux")]
pub use factory::detect_paste_tool;
pub use noop::NoOpPaster;
pub use osascript::OsascriptPaster;
pub use wtype::WtypePaster;
pub use xdotool::XdotoolPaster;
