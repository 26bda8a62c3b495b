//! Cross-platform paste adapter using enigo
//!
//! Works on Windows, macOS, and Linux (X11/Wayland). enigo cannot focus
//! other windows, so the paste lands wherever focus already is.

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{PasteError, Paster};

/// Cross-platform paste adapter using enigo
pub struct EnigoPaster;

impl EnigoPaster {
    /// Create a new enigo paste adapter
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnigoPaster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Paster for EnigoPaster {
    async fn paste(&self, target: Option<&str>) -> Result<(), PasteError> {
        if let Some(target) = target {
            debug!(target, "enigo cannot activate windows; pasting into focused window");
        }

        // enigo operations are blocking, so run in spawn_blocking
        tokio::task::spawn_blocking(move || {
            use enigo::{Direction, Enigo, Key, Keyboard, Settings};

            #[cfg(target_os = "macos")]
            let modifier = Key::Meta;
            #[cfg(not(target_os = "macos"))]
            let modifier = Key::Control;

            let mut enigo = Enigo::new(&Settings::default()).map_err(|e| {
                PasteError::PasteFailed(format!("Failed to create enigo: {}", e))
            })?;

            let chord = |enigo: &mut Enigo| -> Result<(), enigo::InputError> {
                enigo.key(modifier, Direction::Press)?;
                let pressed = enigo.key(Key::Unicode('v'), Direction::Click);
                enigo.key(modifier, Direction::Release)?;
                pressed
            };

            chord(&mut enigo)
                .map_err(|e| PasteError::PasteFailed(format!("Failed to send paste chord: {}", e)))
        })
        .await
        .map_err(|e| PasteError::PasteFailed(format!("Task join error: {}", e)))?
    }
}
