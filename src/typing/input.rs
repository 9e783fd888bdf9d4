//! Keystroke synthesis using enigo
//!
//! Performs one keystroke descriptor at a time against whatever application
//! currently holds input focus. No sequencing logic lives here - that is the
//! engine's job.

use super::keymap::{KeyAction, Mod};
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use std::thread;
use std::time::Duration;

/// Error type for automation and clipboard operations
#[derive(Debug)]
pub enum AutomationError {
    /// The keystroke backend rejected or failed an action
    Key(String),
    /// The system clipboard could not be read or written
    Clipboard(String),
}

impl std::fmt::Display for AutomationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AutomationError::Key(msg) => write!(f, "Keystroke error: {}", msg),
            AutomationError::Clipboard(msg) => write!(f, "Clipboard error: {}", msg),
        }
    }
}

impl std::error::Error for AutomationError {}

/// Performs exactly one keystroke descriptor per call.
///
/// The engine only ever hands this the fixed descriptors from the keystroke
/// table - never anything derived from dictated text.
pub trait Automation {
    fn perform(&mut self, action: KeyAction) -> Result<(), AutomationError>;
}

/// Keystroke backend using enigo
pub struct EnigoInput {
    enigo: Enigo,
}

impl EnigoInput {
    pub fn new() -> Result<Self, AutomationError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| AutomationError::Key(format!("Failed to initialize Enigo: {}", e)))?;
        Ok(Self { enigo })
    }

    /// Get the platform-specific shortcut modifier (Cmd on macOS, Ctrl elsewhere)
    fn modifier_key() -> Key {
        #[cfg(target_os = "macos")]
        {
            Key::Meta
        }
        #[cfg(not(target_os = "macos"))]
        {
            Key::Control
        }
    }

    fn resolve(modifier: Mod) -> Key {
        match modifier {
            Mod::Primary => Self::modifier_key(),
            Mod::Shift => Key::Shift,
        }
    }

    /// Send a single key press
    fn send_key(&mut self, key: Key) -> Result<(), AutomationError> {
        self.enigo
            .key(key, Direction::Click)
            .map_err(|e| AutomationError::Key(format!("Failed to send key: {}", e)))
    }

    /// Send key with modifiers (e.g., Cmd+Z for undo)
    fn send_key_combo(&mut self, modifiers: &[Mod], key: Key) -> Result<(), AutomationError> {
        // Press all modifiers
        for modifier in modifiers {
            self.enigo
                .key(Self::resolve(*modifier), Direction::Press)
                .map_err(|e| AutomationError::Key(format!("Failed to press modifier: {}", e)))?;
        }

        // Small delay for modifiers to register
        thread::sleep(Duration::from_millis(10));

        // Click the main key
        self.enigo
            .key(key, Direction::Click)
            .map_err(|e| AutomationError::Key(format!("Failed to click key: {}", e)))?;

        // Small delay before releasing
        thread::sleep(Duration::from_millis(50));

        // Release all modifiers in reverse order
        for modifier in modifiers.iter().rev() {
            self.enigo
                .key(Self::resolve(*modifier), Direction::Release)
                .map_err(|e| AutomationError::Key(format!("Failed to release modifier: {}", e)))?;
        }

        Ok(())
    }
}

impl Automation for EnigoInput {
    fn perform(&mut self, action: KeyAction) -> Result<(), AutomationError> {
        match action {
            KeyAction::Tap(key) => self.send_key(key),
            KeyAction::Combo { mods, key } => self.send_key_combo(mods, key),
            KeyAction::Paste => self.send_key_combo(&[Mod::Primary], Key::Unicode('v')),
        }
    }
}
