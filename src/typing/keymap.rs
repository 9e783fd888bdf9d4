//! Command-to-keystroke table
//!
//! Maps spoken command names to fixed keystroke descriptors. The vocabulary
//! is a closed enum and every descriptor is a static value - nothing here is
//! ever built from dictated text, so text can never reach the automation
//! layer as anything but paste payload.

use enigo::Key;

/// A modifier held during a key combination.
///
/// `Primary` is the platform shortcut modifier: Cmd on macOS, Ctrl elsewhere.
/// It is resolved to a concrete key at perform time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mod {
    Primary,
    Shift,
}

/// An immutable description of one automation effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// A single unmodified key press.
    Tap(Key),
    /// A base key clicked while the modifiers are held, in order.
    Combo { mods: &'static [Mod], key: Key },
    /// The platform paste chord; inserts whatever is staged on the clipboard.
    Paste,
}

/// Editing commands the engine recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    Newline,
    Tab,
    Space,
    Backspace,
    Delete,
    Escape,
    SelectAll,
    Undo,
    Redo,
    Copy,
    Paste,
    Cut,
    Left,
    Right,
    Up,
    Down,
}

impl EditCommand {
    /// Every recognized command, in display order.
    pub const ALL: [EditCommand; 16] = [
        EditCommand::Newline,
        EditCommand::Tab,
        EditCommand::Space,
        EditCommand::Backspace,
        EditCommand::Delete,
        EditCommand::Escape,
        EditCommand::SelectAll,
        EditCommand::Undo,
        EditCommand::Redo,
        EditCommand::Copy,
        EditCommand::Paste,
        EditCommand::Cut,
        EditCommand::Left,
        EditCommand::Right,
        EditCommand::Up,
        EditCommand::Down,
    ];

    /// Resolve a spoken command name.
    ///
    /// Case-insensitive. Surrounding whitespace and trailing punctuation are
    /// ignored - transcribers like to append periods. Unrecognized names
    /// resolve to `None` and the caller skips them.
    pub fn parse(name: &str) -> Option<EditCommand> {
        let lower = name.trim().to_lowercase();
        let name = lower
            .trim_end_matches(|c: char| c.is_ascii_punctuation())
            .trim_end();

        EditCommand::ALL
            .into_iter()
            .find(|cmd| cmd.aliases().contains(&name))
    }

    /// Accepted spellings, primary name first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            EditCommand::Newline => &["newline", "new line", "enter", "return"],
            EditCommand::Tab => &["tab"],
            EditCommand::Space => &["space", "spacebar"],
            EditCommand::Backspace => &["backspace", "back space"],
            EditCommand::Delete => &["delete", "forward delete"],
            EditCommand::Escape => &["escape"],
            EditCommand::SelectAll => &["select all", "select-all"],
            EditCommand::Undo => &["undo"],
            EditCommand::Redo => &["redo"],
            EditCommand::Copy => &["copy"],
            EditCommand::Paste => &["paste"],
            EditCommand::Cut => &["cut"],
            EditCommand::Left => &["left", "move left"],
            EditCommand::Right => &["right", "move right"],
            EditCommand::Up => &["up", "move up"],
            EditCommand::Down => &["down", "move down"],
        }
    }

    /// Primary display name.
    pub fn name(self) -> &'static str {
        self.aliases()[0]
    }

    /// The keystroke descriptor this command performs.
    pub fn action(self) -> KeyAction {
        match self {
            EditCommand::Newline => KeyAction::Tap(Key::Return),
            EditCommand::Tab => KeyAction::Tap(Key::Tab),
            EditCommand::Space => KeyAction::Tap(Key::Space),
            EditCommand::Backspace => KeyAction::Tap(Key::Backspace),
            EditCommand::Delete => KeyAction::Tap(Key::Delete),
            EditCommand::Escape => KeyAction::Tap(Key::Escape),
            EditCommand::SelectAll => KeyAction::Combo {
                mods: &[Mod::Primary],
                key: Key::Unicode('a'),
            },
            EditCommand::Undo => KeyAction::Combo {
                mods: &[Mod::Primary],
                key: Key::Unicode('z'),
            },
            EditCommand::Redo => KeyAction::Combo {
                mods: &[Mod::Primary, Mod::Shift],
                key: Key::Unicode('z'),
            },
            EditCommand::Copy => KeyAction::Combo {
                mods: &[Mod::Primary],
                key: Key::Unicode('c'),
            },
            EditCommand::Paste => KeyAction::Paste,
            EditCommand::Cut => KeyAction::Combo {
                mods: &[Mod::Primary],
                key: Key::Unicode('x'),
            },
            EditCommand::Left => KeyAction::Tap(Key::LeftArrow),
            EditCommand::Right => KeyAction::Tap(Key::RightArrow),
            EditCommand::Up => KeyAction::Tap(Key::UpArrow),
            EditCommand::Down => KeyAction::Tap(Key::DownArrow),
        }
    }
}
