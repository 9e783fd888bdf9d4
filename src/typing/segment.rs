//! Segment data model
//!
//! The unit of instruction consumed by the execution engine: either literal
//! text to insert, or the name of an editing command. The segmenter produces
//! an ordered list of these per utterance; the engine consumes it exactly
//! once, in order.

use serde::{Deserialize, Serialize};

/// One classified unit of a dictated instruction.
///
/// The wire format is a tagged object, matching the segmenter's output:
/// `{"kind": "text", "value": "hello"}` or
/// `{"kind": "command", "value": "newline"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Segment {
    /// Literal text to insert at the cursor. Empty or whitespace-only text
    /// is a valid no-op.
    Text(String),
    /// Name of an editing command. Names outside the recognized vocabulary
    /// are valid no-ops.
    Command(String),
}

#[allow(dead_code)]
impl Segment {
    pub fn text(value: impl Into<String>) -> Self {
        Segment::Text(value.into())
    }

    pub fn command(value: impl Into<String>) -> Self {
        Segment::Command(value.into())
    }
}
