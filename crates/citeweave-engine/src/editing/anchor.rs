use std::ops::Range;

use crate::editing::buffer::TextBuffer;

/// Remembered selection used to chain successive citation insertions.
///
/// `text` is the exact substring that was selected at capture time; `offset`
/// is its last known start position in the buffer, or `None` once invalidated.
/// Exactly one anchor is live per editing session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionAnchor {
    pub text: String,
    pub offset: Option<usize>,
}

impl SelectionAnchor {
    pub fn new(text: impl Into<String>, offset: usize) -> Self {
        Self {
            text: text.into(),
            offset: Some(offset),
        }
    }

    /// An anchor carrying no position, used after fallback appends and when
    /// the selection target changes.
    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Consistency check: the remembered offset still points at the remembered
    /// text. A stale anchor must be re-resolved by substring search, never
    /// trusted. After an edit the remembered offset may land anywhere,
    /// including inside a multibyte character, so the check goes through
    /// `str::get` rather than slicing directly.
    pub fn is_valid_for(&self, buffer: &TextBuffer) -> bool {
        match self.offset {
            Some(offset) if !self.text.is_empty() => {
                let end = offset + self.text.len();
                if end > buffer.len() {
                    return false;
                }
                let text = buffer.slice(0..buffer.len());
                text.get(offset..end) == Some(self.text.as_str())
            }
            _ => false,
        }
    }
}

/// Resolve a user-visible selection back to a byte range in `buffer`.
///
/// Fast path: when the anchor remembers this exact text and still matches the
/// buffer, its offset is reused, which keeps repeated citations on the same
/// selection from jumping to an earlier duplicate. Otherwise the first
/// occurrence of `raw_selected_text` wins; `None` means the text no longer
/// exists verbatim in the buffer and the caller falls back to appending.
///
/// Known limitation: first-occurrence search can pick a different duplicate
/// than the one the user highlighted.
pub fn locate(
    buffer: &TextBuffer,
    raw_selected_text: &str,
    anchor: &SelectionAnchor,
) -> Option<Range<usize>> {
    if raw_selected_text.is_empty() {
        return None;
    }

    if anchor.text == raw_selected_text && anchor.is_valid_for(buffer) {
        let start = anchor.offset?;
        return Some(start..start + raw_selected_text.len());
    }

    buffer
        .find(raw_selected_text)
        .map(|start| start..start + raw_selected_text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn locate_uses_anchor_fast_path() {
        // Duplicate text: the anchor keeps us on the second occurrence.
        let buffer = TextBuffer::new("claim here. claim here.");
        let anchor = SelectionAnchor::new("claim here", 12);
        assert_eq!(locate(&buffer, "claim here", &anchor), Some(12..22));
    }

    #[test]
    fn locate_falls_back_to_first_occurrence_when_anchor_stale() {
        let buffer = TextBuffer::new("claim here. claim here.");
        // Anchor points at text that is no longer there.
        let anchor = SelectionAnchor::new("claim here", 13);
        assert_eq!(locate(&buffer, "claim here", &anchor), Some(0..10));
    }

    #[test]
    fn locate_ignores_anchor_for_different_text() {
        let buffer = TextBuffer::new("alpha beta");
        let anchor = SelectionAnchor::new("alpha", 0);
        assert_eq!(locate(&buffer, "beta", &anchor), Some(6..10));
    }

    #[test]
    fn locate_returns_none_when_text_gone() {
        let buffer = TextBuffer::new("the draft changed");
        let anchor = SelectionAnchor::cleared();
        assert_eq!(locate(&buffer, "original words", &anchor), None);
    }

    #[test]
    fn locate_rejects_empty_selection() {
        let buffer = TextBuffer::new("anything");
        assert_eq!(locate(&buffer, "", &SelectionAnchor::cleared()), None);
    }

    #[test]
    fn locate_falls_back_when_anchor_offset_splits_a_char() {
        // An edit can leave the remembered offset inside a multibyte char;
        // the consistency check must fail cleanly, not panic.
        let buffer = TextBuffer::new("héllo wörld");
        let anchor = SelectionAnchor::new("wörld", 2);
        assert!(!anchor.is_valid_for(&buffer));
        assert_eq!(locate(&buffer, "wörld", &anchor), Some(7..13));
    }

    #[test]
    fn anchor_past_end_of_buffer_is_stale() {
        let buffer = TextBuffer::new("short");
        let anchor = SelectionAnchor::new("short", 3);
        assert!(!anchor.is_valid_for(&buffer));
        assert_eq!(locate(&buffer, "short", &anchor), Some(0..5));
    }

    #[test]
    fn stale_anchor_fails_consistency_check() {
        let buffer = TextBuffer::new("edited text");
        let anchor = SelectionAnchor::new("original", 0);
        assert!(!anchor.is_valid_for(&buffer));

        let valid = SelectionAnchor::new("edited", 0);
        assert!(valid.is_valid_for(&buffer));

        assert!(!SelectionAnchor::cleared().is_valid_for(&buffer));
    }
}
