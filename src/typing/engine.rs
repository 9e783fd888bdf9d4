//! Execution engine
//!
//! Executes a segment sequence as a single clipboard-transactional unit:
//! snapshot the clipboard, replay segments in order, restore the snapshot on
//! every exit path. Dictated text only ever transits through the clipboard
//! and the fixed paste chord, so it can never be interpreted as a command by
//! the automation layer.

use super::clipboard::{ClipboardText, ClipboardTransaction, SystemClipboard};
use super::input::{Automation, AutomationError, EnigoInput};
use super::keymap::{EditCommand, KeyAction};
use super::segment::Segment;
use crate::config::TypingConfig;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

/// Error from one execution pass.
///
/// By the time this is returned the clipboard has already been restored.
/// Edits applied to the focused application before the failing segment are
/// not rolled back.
#[derive(Debug)]
pub enum ExecutionError {
    /// The opening clipboard snapshot failed; no segment was attempted
    Snapshot(AutomationError),
    /// Automation failed at this segment; later segments were not attempted
    Segment {
        index: usize,
        source: AutomationError,
    },
}

impl std::fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionError::Snapshot(e) => write!(f, "Failed to snapshot clipboard: {}", e),
            ExecutionError::Segment { index, source } => {
                write!(f, "Segment {} failed: {}", index, source)
            }
        }
    }
}

impl std::error::Error for ExecutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecutionError::Snapshot(e) | ExecutionError::Segment { source: e, .. } => Some(e),
        }
    }
}

/// Replays segment sequences into the focused application.
///
/// Generic over the keystroke backend and clipboard so tests can run against
/// in-memory fakes.
pub struct ExecutionEngine<A, C> {
    inner: Mutex<Inner<A, C>>,
}

struct Inner<A, C> {
    input: A,
    clipboard: C,
    config: TypingConfig,
}

impl ExecutionEngine<EnigoInput, SystemClipboard> {
    /// Engine over the real keystroke backend and system clipboard.
    pub fn system(config: TypingConfig) -> Result<Self, AutomationError> {
        Ok(Self::new(EnigoInput::new()?, SystemClipboard::new()?, config))
    }
}

impl<A: Automation, C: ClipboardText> ExecutionEngine<A, C> {
    pub fn new(input: A, clipboard: C, config: TypingConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                input,
                clipboard,
                config,
            }),
        }
    }

    /// Execute the segments in order as one clipboard transaction.
    ///
    /// Passes are serialized: a second caller blocks until the current pass
    /// finishes, since interleaving two passes would interleave keystrokes
    /// and fight over the snapshot/restore pair. Each automation call may
    /// block for the round-trip to the focused application, so treat this as
    /// a slow call and keep it off latency-sensitive threads.
    pub fn execute(&self, segments: &[Segment]) -> Result<(), ExecutionError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.run(segments)
    }
}

impl<A: Automation, C: ClipboardText> Inner<A, C> {
    fn run(&mut self, segments: &[Segment]) -> Result<(), ExecutionError> {
        let Inner {
            input,
            clipboard,
            config,
        } = self;

        // One snapshot read before any segment; restored when `clip` drops.
        let mut clip =
            ClipboardTransaction::begin(clipboard).map_err(ExecutionError::Snapshot)?;

        for (index, segment) in segments.iter().enumerate() {
            let step = match segment {
                Segment::Text(text) => {
                    if text.trim().is_empty() {
                        continue;
                    }
                    paste_text(input, &mut clip, text, config)
                }
                Segment::Command(name) => match EditCommand::parse(name) {
                    Some(cmd) => {
                        if config.verbose {
                            eprintln!("[TYPING] Command: {:?}", cmd);
                        }
                        input.perform(cmd.action())
                    }
                    None => {
                        if config.verbose {
                            eprintln!("[TYPING] Unknown command {:?}, skipping", name);
                        }
                        continue;
                    }
                },
            };

            if let Err(source) = step {
                return Err(ExecutionError::Segment { index, source });
            }
        }

        Ok(())
    }
}

/// Stage text on the clipboard and trigger the fixed paste chord.
fn paste_text<A: Automation, C: ClipboardText>(
    input: &mut A,
    clip: &mut ClipboardTransaction<'_, C>,
    text: &str,
    config: &TypingConfig,
) -> Result<(), AutomationError> {
    let bounded = bound_chars(text, config.max_text_chars);
    if config.verbose {
        if bounded.len() < text.len() {
            eprintln!("[TYPING] Text truncated to {} chars", config.max_text_chars);
        }
        eprintln!("[TYPING] Pasting {} chars", bounded.chars().count());
    }

    clip.stage(bounded)?;
    // Give the clipboard a beat before pasting, and the target a beat after
    sleep_ms(config.paste_settle_ms);
    input.perform(KeyAction::Paste)?;
    sleep_ms(config.paste_grace_ms);
    Ok(())
}

/// Cut text to at most `max` chars, on a char boundary. Oversized text is
/// truncated rather than rejected.
fn bound_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

fn sleep_ms(ms: u64) {
    if ms > 0 {
        thread::sleep(Duration::from_millis(ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct FakeInput {
        calls: Arc<Mutex<Vec<KeyAction>>>,
        fail_at_call: Option<usize>,
    }

    impl FakeInput {
        fn calls(&self) -> Vec<KeyAction> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Automation for FakeInput {
        fn perform(&mut self, action: KeyAction) -> Result<(), AutomationError> {
            let mut calls = self.calls.lock().unwrap();
            if self.fail_at_call == Some(calls.len()) {
                return Err(AutomationError::Key("no focused element".to_string()));
            }
            calls.push(action);
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct FakeClipboard {
        content: Arc<Mutex<String>>,
        writes: Arc<Mutex<Vec<String>>>,
        write_attempts: Arc<Mutex<usize>>,
        fail_reads: bool,
        fail_at_write: Option<usize>,
    }

    impl FakeClipboard {
        fn with_content(content: &str) -> Self {
            let clipboard = FakeClipboard::default();
            *clipboard.content.lock().unwrap() = content.to_string();
            clipboard
        }

        fn content(&self) -> String {
            self.content.lock().unwrap().clone()
        }

        fn writes(&self) -> Vec<String> {
            self.writes.lock().unwrap().clone()
        }
    }

    impl ClipboardText for FakeClipboard {
        fn get_text(&mut self) -> Result<String, AutomationError> {
            if self.fail_reads {
                return Err(AutomationError::Clipboard("unavailable".to_string()));
            }
            Ok(self.content.lock().unwrap().clone())
        }

        fn set_text(&mut self, text: &str) -> Result<(), AutomationError> {
            let attempt = {
                let mut attempts = self.write_attempts.lock().unwrap();
                let n = *attempts;
                *attempts += 1;
                n
            };
            if self.fail_at_write == Some(attempt) {
                return Err(AutomationError::Clipboard("write rejected".to_string()));
            }
            self.writes.lock().unwrap().push(text.to_string());
            *self.content.lock().unwrap() = text.to_string();
            Ok(())
        }
    }

    fn quick_config() -> TypingConfig {
        TypingConfig {
            max_text_chars: 64,
            paste_settle_ms: 0,
            paste_grace_ms: 0,
            verbose: false,
        }
    }

    fn engine(
        input: &FakeInput,
        clipboard: &FakeClipboard,
        config: TypingConfig,
    ) -> ExecutionEngine<FakeInput, FakeClipboard> {
        ExecutionEngine::new(input.clone(), clipboard.clone(), config)
    }

    #[test]
    fn test_text_command_text_scenario() {
        let input = FakeInput::default();
        let clipboard = FakeClipboard::with_content("X");
        let engine = engine(&input, &clipboard, quick_config());

        engine
            .execute(&[
                Segment::text("hello"),
                Segment::command("newline"),
                Segment::text("world"),
            ])
            .unwrap();

        assert_eq!(
            input.calls(),
            vec![
                KeyAction::Paste,
                EditCommand::Newline.action(),
                KeyAction::Paste,
            ]
        );
        // Text reached the clipboard in order, and the last write restored
        // the snapshot
        assert_eq!(clipboard.writes(), vec!["hello", "world", "X"]);
        assert_eq!(clipboard.content(), "X");
    }

    #[test]
    fn test_whitespace_text_is_noop() {
        let input = FakeInput::default();
        let clipboard = FakeClipboard::with_content("Y");
        let engine = engine(&input, &clipboard, quick_config());

        engine.execute(&[Segment::text("   ")]).unwrap();

        assert!(input.calls().is_empty());
        // The segment itself staged nothing; only the final restore wrote
        assert_eq!(clipboard.writes(), vec!["Y"]);
        assert_eq!(clipboard.content(), "Y");
    }

    #[test]
    fn test_unknown_command_is_noop() {
        let input = FakeInput::default();
        let clipboard = FakeClipboard::with_content("Z");
        let engine = engine(&input, &clipboard, quick_config());

        engine.execute(&[Segment::command("bogus")]).unwrap();

        assert!(input.calls().is_empty());
        assert_eq!(clipboard.content(), "Z");
    }

    #[test]
    fn test_empty_sequence() {
        let input = FakeInput::default();
        let clipboard = FakeClipboard::with_content("keep");
        let engine = engine(&input, &clipboard, quick_config());

        engine.execute(&[]).unwrap();

        assert!(input.calls().is_empty());
        assert_eq!(clipboard.content(), "keep");
    }

    #[test]
    fn test_stops_at_first_automation_failure() {
        let input = FakeInput {
            fail_at_call: Some(1),
            ..FakeInput::default()
        };
        let clipboard = FakeClipboard::with_content("X");
        let engine = engine(&input, &clipboard, quick_config());

        let err = engine
            .execute(&[
                Segment::text("hello"),
                Segment::command("newline"),
                Segment::text("never typed"),
            ])
            .unwrap_err();

        match err {
            ExecutionError::Segment { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {:?}", other),
        }
        // Only the first paste went through, and the clipboard came back
        assert_eq!(input.calls(), vec![KeyAction::Paste]);
        assert_eq!(clipboard.content(), "X");
    }

    #[test]
    fn test_failure_index_counts_segments_not_calls() {
        let input = FakeInput {
            fail_at_call: Some(1),
            ..FakeInput::default()
        };
        let clipboard = FakeClipboard::with_content("X");
        let engine = engine(&input, &clipboard, quick_config());

        // Segment 0 is a no-op, segment 1 makes call 0, segment 2 makes the
        // failing call
        let err = engine
            .execute(&[
                Segment::command("bogus"),
                Segment::text("hi"),
                Segment::command("tab"),
            ])
            .unwrap_err();

        match err {
            ExecutionError::Segment { index, .. } => assert_eq!(index, 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_shell_metacharacters_only_ever_pasted() {
        let input = FakeInput::default();
        let clipboard = FakeClipboard::with_content("X");
        let engine = engine(&input, &clipboard, quick_config());

        let hostile = r#"\"; rm -rf ~ `reboot` $(true) | tee"#;
        engine.execute(&[Segment::text(hostile)]).unwrap();

        // The invoker saw only the fixed paste trigger; the text itself
        // travelled via the clipboard
        assert_eq!(input.calls(), vec![KeyAction::Paste]);
        assert_eq!(clipboard.writes()[0], hostile);
        assert_eq!(clipboard.content(), "X");
    }

    #[test]
    fn test_oversized_text_truncated_on_char_boundary() {
        let input = FakeInput::default();
        let clipboard = FakeClipboard::with_content("X");
        let config = TypingConfig {
            max_text_chars: 5,
            ..quick_config()
        };
        let engine = engine(&input, &clipboard, config);

        engine.execute(&[Segment::text("héllo wörld")]).unwrap();

        assert_eq!(clipboard.writes()[0], "héllo");
        assert_eq!(input.calls(), vec![KeyAction::Paste]);
    }

    #[test]
    fn test_snapshot_failure_aborts_before_any_segment() {
        let input = FakeInput::default();
        let clipboard = FakeClipboard {
            fail_reads: true,
            ..FakeClipboard::default()
        };
        let engine = engine(&input, &clipboard, quick_config());

        let err = engine.execute(&[Segment::text("hello")]).unwrap_err();

        assert!(matches!(err, ExecutionError::Snapshot(_)));
        assert!(input.calls().is_empty());
        assert!(clipboard.writes().is_empty());
    }

    #[test]
    fn test_staging_failure_still_restores() {
        let input = FakeInput::default();
        let clipboard = FakeClipboard::with_content("X");
        let engine = engine(
            &input,
            &FakeClipboard {
                fail_at_write: Some(0),
                ..clipboard.clone()
            },
            quick_config(),
        );

        let err = engine.execute(&[Segment::text("hello")]).unwrap_err();

        match err {
            ExecutionError::Segment { index, source } => {
                assert_eq!(index, 0);
                assert!(matches!(source, AutomationError::Clipboard(_)));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(input.calls().is_empty());
        // The restore was write attempt 1 and went through
        assert_eq!(clipboard.writes(), vec!["X"]);
        assert_eq!(clipboard.content(), "X");
    }

    #[test]
    fn test_paste_command_uses_fixed_trigger() {
        let input = FakeInput::default();
        let clipboard = FakeClipboard::with_content("copied earlier");
        let engine = engine(&input, &clipboard, quick_config());

        engine.execute(&[Segment::command("paste")]).unwrap();

        assert_eq!(input.calls(), vec![KeyAction::Paste]);
        assert_eq!(clipboard.content(), "copied earlier");
    }

    #[test]
    fn test_all_noop_sequence_is_idempotent() {
        let input = FakeInput::default();
        let clipboard = FakeClipboard::with_content("stable");
        let engine = engine(&input, &clipboard, quick_config());

        let segments = vec![
            Segment::text(""),
            Segment::command("not a command"),
            Segment::text("  \t "),
        ];
        engine.execute(&segments).unwrap();
        engine.execute(&segments).unwrap();

        assert!(input.calls().is_empty());
        assert_eq!(clipboard.content(), "stable");
    }
}
