use std::ops::Range;

/// Sentence boundary characters. Newline counts so list-style drafts do not
/// bleed selections across lines.
fn is_boundary(byte: u8) -> bool {
    matches!(byte, b'.' | b'?' | b'!' | b'\n')
}

/// Byte range of the sentence around `cursor`, used to select "the current
/// sentence" when the user cites without an explicit selection.
///
/// When the character right before the cursor is a boundary, the result is the
/// sentence that just ended there. Otherwise the range runs from just after
/// the previous boundary to the next boundary inclusive, or end-of-text when
/// no boundary follows. Degenerate ranges clamp to a single character ending
/// at `end`.
pub fn sentence_at(text: &str, cursor: usize) -> Range<usize> {
    let bytes = text.as_bytes();
    let mut cursor = cursor.min(text.len());
    while cursor > 0 && !text.is_char_boundary(cursor) {
        cursor -= 1;
    }

    let (mut start, end);
    if cursor > 0 && is_boundary(bytes[cursor - 1]) {
        // Cursor sits right after a sentence end: take the sentence that just
        // closed, back to the previous boundary.
        end = cursor;
        start = cursor - 1;
        while start > 0 && !is_boundary(bytes[start - 1]) {
            start -= 1;
        }
    } else {
        start = cursor;
        while start > 0 && !is_boundary(bytes[start - 1]) {
            start -= 1;
        }

        let mut scan = cursor;
        loop {
            if scan >= bytes.len() {
                break;
            }
            let was_boundary = is_boundary(bytes[scan]);
            scan += 1;
            if was_boundary {
                break;
            }
        }
        end = scan;
    }

    if start >= end {
        start = end.saturating_sub(1);
    }
    start..end
}
