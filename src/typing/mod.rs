//! Voice-to-keyboard command execution
//!
//! Replays a segmenter's classified output into the focused application:
//! literal text goes through the clipboard and a paste chord, named editing
//! commands go through a fixed keystroke table.
//!
//! # Guarantees
//!
//! - **Clipboard transaction**: the clipboard is snapshotted once per pass
//!   and restored on every exit path, so other applications never see our
//!   staging writes
//! - **Ordering**: segment effects reach the focused application in input
//!   order; a pass stops at the first automation failure
//! - **Injection safety**: dictated text is never embedded in a keystroke
//!   descriptor - the invoker only ever receives fixed table entries

mod clipboard;
mod engine;
mod input;
mod keymap;
mod segment;

pub use clipboard::{ClipboardText, ClipboardTransaction, SystemClipboard};
pub use engine::{ExecutionEngine, ExecutionError};
pub use input::{Automation, AutomationError, EnigoInput};
pub use keymap::{EditCommand, KeyAction, Mod};
pub use segment::Segment;
