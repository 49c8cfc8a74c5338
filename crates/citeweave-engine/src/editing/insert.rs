use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::editing::anchor::SelectionAnchor;
use crate::editing::buffer::TextBuffer;

/// A citation token as stored in plain text: optional whitespace, a
/// parenthesized label, then a bracketed URL with no separator.
static CITATION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]+\)\[[^\]]+\]").expect("valid citation token pattern"));

/// Maximum gap, in bytes, between the insertion cursor and the start of a
/// citation token for the token to count as chained onto the selection. A
/// single separating space chains; intervening prose does not.
pub const CHAIN_GAP_MAX: usize = 2;

/// Result of splicing a citation into a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    /// The new buffer snapshot.
    pub buffer: TextBuffer,
    /// Refreshed anchor so the next citation on the same selection reuses the
    /// fast path; cleared when the citation was appended at the end.
    pub anchor: SelectionAnchor,
    /// Byte offset where the citation text landed, for caret restoration.
    pub offset: usize,
}

/// Splice `citation` into `buffer` after the resolved selection and after any
/// citations already chained onto it.
///
/// With no resolvable selection (or a collapsed range) the citation is
/// appended at the end of the buffer and the anchor is cleared. The operation
/// is all-or-nothing: exactly one splice, no partial mutation.
///
/// Chaining keeps repeated citations contiguous, e.g.
/// `...claim (A)[u1] (B)[u2].` rather than scattering the second citation
/// after the trailing period.
pub fn insert_citation(
    buffer: &TextBuffer,
    selection: Option<Range<usize>>,
    selected_text: &str,
    citation: &str,
) -> Insertion {
    let Some(range) = selection.filter(|r| r.start < r.end) else {
        log::debug!("selection unresolvable, appending citation at end of buffer");
        let offset = buffer.len();
        return Insertion {
            buffer: buffer.splice(offset, citation),
            anchor: SelectionAnchor::cleared(),
            offset,
        };
    };

    let text = buffer.to_string();
    let mut cursor = range.end.min(text.len());

    // Skip over citation tokens already chained onto the selection so the new
    // one lands after the last of them.
    while let Some(m) = CITATION_TOKEN.find(&text[cursor..]) {
        if m.start() > CHAIN_GAP_MAX {
            break;
        }
        cursor += m.end();
    }

    Insertion {
        buffer: buffer.splice(cursor, citation),
        anchor: SelectionAnchor::new(selected_text, range.start),
        offset: cursor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::anchor::locate;
    use pretty_assertions::assert_eq;

    #[test]
    fn inserts_directly_after_selection() {
        let buffer = TextBuffer::new("claim here.");
        let out = insert_citation(&buffer, Some(0..10), "claim here", " (A)[u1]");
        assert_eq!(out.buffer.to_string(), "claim here (A)[u1].");
        assert_eq!(out.anchor, SelectionAnchor::new("claim here", 0));
        assert_eq!(out.offset, 10);
    }

    #[test]
    fn second_citation_chains_after_first() {
        let buffer = TextBuffer::new("claim here.");
        let first = insert_citation(&buffer, Some(0..10), "claim here", " (A)[u1]");

        // Same selection resolved again via the refreshed anchor.
        let range = locate(&first.buffer, "claim here", &first.anchor);
        let second = insert_citation(&first.buffer, range, "claim here", " (B)[u2]");

        assert_eq!(second.buffer.to_string(), "claim here (A)[u1] (B)[u2].");
        assert_eq!(second.offset, 18);
    }

    #[test]
    fn chains_past_multiple_existing_citations() {
        let buffer = TextBuffer::new("claim (A)[u1] (B)[u2]. More text.");
        let out = insert_citation(&buffer, Some(0..5), "claim", " (C)[u3]");
        assert_eq!(
            out.buffer.to_string(),
            "claim (A)[u1] (B)[u2] (C)[u3]. More text."
        );
    }

    #[test]
    fn does_not_chain_across_intervening_prose() {
        let buffer = TextBuffer::new("claim text (A)[u1].");
        let out = insert_citation(&buffer, Some(0..5), "claim", " (B)[u2]");
        // "(A)[u1]" starts 6 bytes after the selection, so it is not chained.
        assert_eq!(out.buffer.to_string(), "claim (B)[u2] text (A)[u1].");
    }

    #[test]
    fn unresolved_selection_appends_and_clears_anchor() {
        let buffer = TextBuffer::new("the text changed entirely.");
        let out = insert_citation(&buffer, None, "old words", " (A)[u1]");
        assert_eq!(out.buffer.to_string(), "the text changed entirely. (A)[u1]");
        assert_eq!(out.anchor, SelectionAnchor::cleared());
        assert_eq!(out.offset, 26);
    }

    #[test]
    fn collapsed_range_treated_as_unresolved() {
        let buffer = TextBuffer::new("some text");
        let out = insert_citation(&buffer, Some(4..4), "", " (A)[u1]");
        assert_eq!(out.buffer.to_string(), "some text (A)[u1]");
        assert_eq!(out.anchor, SelectionAnchor::cleared());
    }

    #[test]
    fn selection_at_end_of_buffer() {
        let buffer = TextBuffer::new("final claim");
        let out = insert_citation(&buffer, Some(6..11), "claim", " (A)[u1]");
        assert_eq!(out.buffer.to_string(), "final claim (A)[u1]");
    }
}
