//! Copying payloads to the system clipboard.
//!
//! `Clipboard` is the seam; `SystemClipboard` wraps arboard and only exists
//! with the `clipboard` feature. A failed copy is reported, never fatal.

use crate::error::ClipboardError;

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[cfg(feature = "clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let inner = arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(SystemClipboard { inner })
    }
}

#[cfg(feature = "clipboard")]
impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner
            .set_text(text)
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}

/// The platform clipboard. On X11 the contents are handed to the clipboard
/// manager when the handle drops; without one they are gone once qrkeep exits.
pub fn system() -> Result<Box<dyn Clipboard>, ClipboardError> {
    #[cfg(feature = "clipboard")]
    {
        Ok(Box::new(SystemClipboard::new()?))
    }
    #[cfg(not(feature = "clipboard"))]
    {
        Err(ClipboardError::Unsupported)
    }
}

/// Copy `text`, logging instead of failing. Returns whether it was copied.
pub fn copy(clipboard: &mut dyn Clipboard, text: &str) -> bool {
    match clipboard.set_text(text) {
        Ok(()) => {
            tracing::debug!(len = text.len(), "copied payload to clipboard");
            true
        }
        Err(e) => {
            tracing::warn!("failed to copy to clipboard: {e}");
            false
        }
    }
}
