//! Clipboard access and the restore-on-exit transaction guard
//!
//! The clipboard is shared, uncoordinated global state. The engine stages
//! each text segment on it, so a pass must put back whatever was there
//! before - on every exit path, including a failure partway through.

use super::input::AutomationError;
use arboard::Clipboard;

/// Text-only clipboard interface. Reads and writes of other content types
/// (images, file lists) are not used.
pub trait ClipboardText {
    fn get_text(&mut self) -> Result<String, AutomationError>;
    fn set_text(&mut self, text: &str) -> Result<(), AutomationError>;
}

/// System clipboard via arboard
pub struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, AutomationError> {
        let clipboard = Clipboard::new().map_err(|e| {
            AutomationError::Clipboard(format!("Failed to initialize clipboard: {}", e))
        })?;
        Ok(Self { clipboard })
    }
}

impl ClipboardText for SystemClipboard {
    fn get_text(&mut self) -> Result<String, AutomationError> {
        match self.clipboard.get_text() {
            Ok(text) => Ok(text),
            // Non-text content reads as empty text
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(AutomationError::Clipboard(format!(
                "Failed to read clipboard: {}",
                e
            ))),
        }
    }

    fn set_text(&mut self, text: &str) -> Result<(), AutomationError> {
        self.clipboard
            .set_text(text)
            .map_err(|e| AutomationError::Clipboard(format!("Failed to set clipboard: {}", e)))
    }
}

/// Holds the clipboard's pre-pass content and writes it back when dropped.
///
/// Dropping on every exit path - normal return, early stop on an automation
/// failure, or a panic mid-pass - is what makes the restore guarantee hold.
/// If another process writes the clipboard while a pass is in flight, the
/// restore still writes the pre-pass value over it.
pub struct ClipboardTransaction<'a, C: ClipboardText> {
    clipboard: &'a mut C,
    snapshot: String,
}

impl<'a, C: ClipboardText> ClipboardTransaction<'a, C> {
    /// Read the current clipboard text once and begin the transaction.
    pub fn begin(clipboard: &'a mut C) -> Result<Self, AutomationError> {
        let snapshot = clipboard.get_text()?;
        Ok(Self { clipboard, snapshot })
    }

    /// Stage text on the clipboard for the next paste.
    pub fn stage(&mut self, text: &str) -> Result<(), AutomationError> {
        self.clipboard.set_text(text)
    }
}

impl<C: ClipboardText> Drop for ClipboardTransaction<'_, C> {
    fn drop(&mut self) {
        // A failed restore must not mask whatever ended the pass; note it
        // and move on.
        if let Err(e) = self.clipboard.set_text(&self.snapshot) {
            eprintln!("[TYPING] Failed to restore clipboard: {}", e);
        }
    }
}
