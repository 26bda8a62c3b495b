//! Cross-platform clipboard adapter using arboard
//!
//! Works on Windows, macOS, and Linux (X11/Wayland). Images cross the port
//! boundary as PNG bytes; arboard itself speaks raw RGBA.
//!
//! One `arboard::Clipboard` is kept open for the life of the adapter. On
//! X11 the selection written by `use` is only served while a handle exists.

use std::borrow::Cow;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::ports::{Clipboard, ClipboardError};
use crate::domain::history::Sample;

type Slot<H> = Arc<Mutex<Option<H>>>;

/// Cross-platform clipboard adapter using arboard
pub struct ArboardClipboard {
    handle: Slot<arboard::Clipboard>,
}

impl ArboardClipboard {
    /// Create a new arboard clipboard adapter. The handle is opened on first use.
    pub fn new() -> Self {
        Self {
            handle: Arc::new(Mutex::new(None)),
        }
    }

    async fn run<T, F>(&self, op: F) -> Result<T, ClipboardError>
    where
        T: Send + 'static,
        F: FnOnce(&mut arboard::Clipboard) -> Result<T, ClipboardError> + Send + 'static,
    {
        let handle = Arc::clone(&self.handle);
        // arboard operations are blocking
        tokio::task::spawn_blocking(move || with_handle(&*handle, open, op))
            .await
            .map_err(|e| ClipboardError::ClipboardUnavailable(format!("Task join error: {}", e)))?
    }
}

impl Default for ArboardClipboard {
    fn default() -> Self {
        Self::new()
    }
}

fn open() -> Result<arboard::Clipboard, ClipboardError> {
    arboard::Clipboard::new().map_err(|e| ClipboardError::ClipboardUnavailable(e.to_string()))
}

/// Run `op` on the shared handle, opening it if needed.
///
/// A failed operation drops the handle so the next call reconnects.
fn with_handle<H, T>(
    slot: &Mutex<Option<H>>,
    open: impl FnOnce() -> Result<H, ClipboardError>,
    op: impl FnOnce(&mut H) -> Result<T, ClipboardError>,
) -> Result<T, ClipboardError> {
    let mut guard = slot
        .lock()
        .map_err(|_| ClipboardError::ClipboardUnavailable("clipboard handle poisoned".to_string()))?;

    let handle = match guard.take() {
        Some(handle) => handle,
        None => open()?,
    };
    let result = op(guard.insert(handle));
    if result.is_err() {
        *guard = None;
    }
    result
}

fn read_sample(clipboard: &mut arboard::Clipboard) -> Result<Option<Sample>, ClipboardError> {
    match clipboard.get_text() {
        Ok(text) => {
            if let Some(sample) = Sample::text(text) {
                return Ok(Some(sample));
            }
        }
        Err(arboard::Error::ContentNotAvailable) => {}
        Err(e) => return Err(ClipboardError::ReadFailed(e.to_string())),
    }

    match clipboard.get_image() {
        Ok(image) => Ok(Sample::image(encode_png(&image)?)),
        Err(arboard::Error::ContentNotAvailable) => Ok(None),
        Err(e) => Err(ClipboardError::ReadFailed(e.to_string())),
    }
}

/// Encode raw RGBA clipboard data as PNG
fn encode_png(image: &arboard::ImageData) -> Result<Vec<u8>, ClipboardError> {
    let rgba = image::RgbaImage::from_raw(
        image.width as u32,
        image.height as u32,
        image.bytes.to_vec(),
    )
    .ok_or_else(|| {
        ClipboardError::InvalidImage(format!(
            "{}x{} image with {} bytes",
            image.width,
            image.height,
            image.bytes.len()
        ))
    })?;

    let mut png = Vec::new();
    rgba.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| ClipboardError::InvalidImage(e.to_string()))?;
    Ok(png)
}

/// Decode PNG bytes into the RGBA form arboard expects
fn decode_png(png: &[u8]) -> Result<arboard::ImageData<'static>, ClipboardError> {
    let rgba = image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .map_err(|e| ClipboardError::InvalidImage(e.to_string()))?
        .to_rgba8();

    Ok(arboard::ImageData {
        width: rgba.width() as usize,
        height: rgba.height() as usize,
        bytes: Cow::Owned(rgba.into_raw()),
    })
}

#[async_trait]
impl Clipboard for ArboardClipboard {
    async fn read(&self) -> Result<Option<Sample>, ClipboardError> {
        self.run(read_sample).await
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let text = text.to_owned();
        self.run(move |clipboard| {
            clipboard
                .set_text(text)
                .map_err(|e| ClipboardError::CopyFailed(e.to_string()))
        })
        .await
    }

    async fn write_image(&self, png: &[u8]) -> Result<(), ClipboardError> {
        let image = decode_png(png)?;
        self.run(move |clipboard| {
            clipboard
                .set_image(image)
                .map_err(|e| ClipboardError::CopyFailed(e.to_string()))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard() -> arboard::ImageData<'static> {
        let mut bytes = Vec::new();
        for i in 0..16u8 {
            let v = if i % 2 == 0 { 255 } else { 0 };
            bytes.extend_from_slice(&[v, v, v, 255]);
        }
        arboard::ImageData {
            width: 4,
            height: 4,
            bytes: Cow::Owned(bytes),
        }
    }

    #[test]
    fn clipboard_default_creates() {
        let clipboard = ArboardClipboard::default();
        assert!(clipboard.handle.lock().unwrap().is_none());
    }

    #[test]
    fn handle_is_opened_once_and_kept() {
        let slot = Mutex::new(None);
        let mut opened = 0;

        for value in ["first", "second"] {
            with_handle(
                &slot,
                || {
                    opened += 1;
                    Ok(Vec::new())
                },
                |held: &mut Vec<&str>| {
                    held.push(value);
                    Ok(())
                },
            )
            .unwrap();
        }

        assert_eq!(opened, 1);
        assert_eq!(*slot.lock().unwrap(), Some(vec!["first", "second"]));
    }

    #[test]
    fn failed_operation_drops_handle() {
        let slot = Mutex::new(Some(1));
        let result: Result<(), _> = with_handle(
            &slot,
            || Ok(2),
            |_| Err(ClipboardError::CopyFailed("connection lost".to_string())),
        );

        assert!(result.is_err());
        assert!(slot.lock().unwrap().is_none());
    }

    #[test]
    fn failed_open_is_retried() {
        let slot: Mutex<Option<u8>> = Mutex::new(None);
        let result = with_handle(
            &slot,
            || Err(ClipboardError::ClipboardUnavailable("no display".to_string())),
            |_| Ok(()),
        );
        assert!(result.is_err());

        with_handle(&slot, || Ok(7), |_| Ok(())).unwrap();
        assert_eq!(*slot.lock().unwrap(), Some(7));
    }

    #[test]
    fn png_encoding_preserves_pixels() {
        let original = checkerboard();
        let png = encode_png(&original).unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let decoded = decode_png(&png).unwrap();
        assert_eq!(decoded.width, 4);
        assert_eq!(decoded.height, 4);
        assert_eq!(decoded.bytes, original.bytes);
    }

    #[test]
    fn mismatched_dimensions_are_rejected() {
        let image = arboard::ImageData {
            width: 10,
            height: 10,
            bytes: Cow::Owned(vec![0; 4]),
        };
        assert!(matches!(
            encode_png(&image),
            Err(ClipboardError::InvalidImage(_))
        ));
    }

    #[test]
    fn garbage_is_not_a_png() {
        assert!(matches!(
            decode_png(b"not a png"),
            Err(ClipboardError::InvalidImage(_))
        ));
    }
}
