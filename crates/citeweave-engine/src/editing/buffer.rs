use std::borrow::Cow;
use std::fmt;

use xi_rope::{Rope, delta::Builder};

/// Immutable snapshot of the full draft text.
///
/// Backed by an `xi_rope::Rope` so snapshots clone cheaply. Every mutation
/// returns a new `TextBuffer`; callers replace their buffer wholesale rather
/// than editing through it. All offsets are byte offsets into the text.
#[derive(Clone)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from(text),
        }
    }

    pub fn len(&self) -> usize {
        self.rope.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len() == 0
    }

    /// Slice the buffer to a cow string, clamping the range to buffer bounds.
    pub fn slice(&self, range: std::ops::Range<usize>) -> Cow<'_, str> {
        let len = self.rope.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        self.rope.slice_to_cow(start..end)
    }

    /// Byte offset of the first occurrence of `needle`, if any.
    ///
    /// First occurrence only: when the needle repeats in the draft the earlier
    /// match wins, even if the user highlighted a later one.
    pub fn find(&self, needle: &str) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        self.rope.slice_to_cow(0..self.rope.len()).find(needle)
    }

    /// Return a new buffer with `text` inserted at byte offset `at`.
    ///
    /// `at` is clamped to the buffer length, so `splice(len, ..)` appends.
    pub fn splice(&self, at: usize, text: &str) -> Self {
        let at = at.min(self.rope.len());
        let mut builder = Builder::new(self.rope.len());
        builder.replace(at..at, Rope::from(text));
        let delta = builder.build();
        Self {
            rope: delta.apply(&self.rope),
        }
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TextBuffer {
    fn from(text: String) -> Self {
        Self::new(&text)
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rope)
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextBuffer({:?})", self.to_string())
    }
}

impl PartialEq for TextBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for TextBuffer {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splice_inserts_at_offset() {
        let buffer = TextBuffer::new("Hello World");
        let spliced = buffer.splice(5, " there");
        assert_eq!(spliced.to_string(), "Hello there World");
        // The original snapshot is untouched
        assert_eq!(buffer.to_string(), "Hello World");
    }

    #[test]
    fn splice_at_end_appends() {
        let buffer = TextBuffer::new("claim");
        let spliced = buffer.splice(buffer.len(), " (A)[u1]");
        assert_eq!(spliced.to_string(), "claim (A)[u1]");
    }

    #[test]
    fn splice_clamps_past_end() {
        let buffer = TextBuffer::new("ab");
        let spliced = buffer.splice(99, "c");
        assert_eq!(spliced.to_string(), "abc");
    }

    #[test]
    fn find_returns_first_occurrence() {
        let buffer = TextBuffer::new("one two one");
        assert_eq!(buffer.find("one"), Some(0));
        assert_eq!(buffer.find("two"), Some(4));
        assert_eq!(buffer.find("three"), None);
        assert_eq!(buffer.find(""), None);
    }

    #[test]
    fn slice_clamps_out_of_bounds_ranges() {
        let buffer = TextBuffer::new("short");
        assert_eq!(buffer.slice(0..3), "sho");
        assert_eq!(buffer.slice(2..99), "ort");
        assert_eq!(buffer.slice(7..9), "");
    }

    #[test]
    fn unicode_content_round_trips() {
        let text = "Hello 世界! 🦀";
        let buffer = TextBuffer::new(text);
        assert_eq!(buffer.to_string(), text);
        assert_eq!(buffer.len(), text.len());
    }
}
