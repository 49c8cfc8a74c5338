//! Rendering between the plain-text buffer and editable markup.
//!
//! The persisted form of a citation is the literal `(label)[url]` token. For
//! display every token becomes a non-editable hyperlink span; everything else
//! passes through with only the escaping HTML requires. `to_plain_text` is the
//! inverse, so the editing surface can round-trip user edits back into buffer
//! form without markup leaking into the logical text.

use std::sync::LazyLock;

use regex::Regex;

use crate::editing::buffer::TextBuffer;

/// Same token shape the insertion scanner recognizes, with label and URL
/// captured. The two must agree or rendered citations would drift from the
/// chaining behavior.
static LINK_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]+)\)\[([^\]]+)\]").expect("valid link token pattern"));

static ANCHOR_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a contenteditable="false" href="([^"]*)" target="_blank">([^<]*)</a>"#)
        .expect("valid anchor span pattern")
});

/// Render the buffer as markup with citation tokens turned into hyperlinks.
pub fn to_markup(buffer: &TextBuffer) -> String {
    let text = buffer.to_string();
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in LINK_TOKEN.captures_iter(&text) {
        let whole = caps.get(0).expect("match has a whole capture");
        out.push_str(&html_escape::encode_text(&text[last..whole.start()]));

        let label = caps.get(1).map_or("", |m| m.as_str());
        let url = caps.get(2).map_or("", |m| m.as_str());
        out.push_str(&format!(
            r#"<a contenteditable="false" href="{}" target="_blank">{}</a>"#,
            html_escape::encode_double_quoted_attribute(url),
            html_escape::encode_text(label),
        ));
        last = whole.end();
    }

    out.push_str(&html_escape::encode_text(&text[last..]));
    out
}

/// Extract the plain buffer text back out of rendered markup: hyperlink spans
/// become `(label)[url]` tokens again and escaped text is decoded.
pub fn to_plain_text(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut last = 0;

    for caps in ANCHOR_SPAN.captures_iter(markup) {
        let whole = caps.get(0).expect("match has a whole capture");
        out.push_str(&html_escape::decode_html_entities(
            &markup[last..whole.start()],
        ));

        let url = caps.get(1).map_or("", |m| m.as_str());
        let label = caps.get(2).map_or("", |m| m.as_str());
        out.push_str(&format!(
            "({})[{}]",
            html_escape::decode_html_entities(label),
            html_escape::decode_html_entities(url),
        ));
        last = whole.end();
    }

    out.push_str(&html_escape::decode_html_entities(&markup[last..]));
    out
}
