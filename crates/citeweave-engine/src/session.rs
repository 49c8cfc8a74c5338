//! The editing session: one live buffer, one live anchor, one outstanding
//! search. All state the assistant tracks between user actions is held in an
//! explicit [`EditingSession`] value so every operation stays a pure function
//! of session plus input.

use std::ops::Range;

use crate::citation::{CitationStyle, SourceDoc, format_citation};
use crate::editing::anchor::{SelectionAnchor, locate};
use crate::editing::buffer::TextBuffer;
use crate::editing::insert::insert_citation;
use crate::editing::sentence::sentence_at;

pub struct EditingSession {
    buffer: TextBuffer,
    anchor: SelectionAnchor,
    selected_text: Option<String>,
    style: CitationStyle,
    results: Vec<SourceDoc>,
    search_pending: bool,
}

impl EditingSession {
    pub fn new(text: &str, style: CitationStyle) -> Self {
        Self {
            buffer: TextBuffer::new(text),
            anchor: SelectionAnchor::cleared(),
            selected_text: None,
            style,
            results: Vec::new(),
            search_pending: false,
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn style(&self) -> CitationStyle {
        self.style
    }

    pub fn set_style(&mut self, style: CitationStyle) {
        self.style = style;
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selected_text.as_deref()
    }

    pub fn results(&self) -> &[SourceDoc] {
        &self.results
    }

    /// Replace the whole draft, e.g. after the user edits freely. Selection,
    /// anchor and stale results are all dropped.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = TextBuffer::new(text);
        self.selected_text = None;
        self.anchor.clear();
        self.results.clear();
    }

    /// Capture a selection. Whitespace is trimmed; empty selections are
    /// ignored. Selecting different text than before invalidates the anchor
    /// and drops the previous result set so citations start fresh.
    pub fn select(&mut self, raw_text: &str) -> bool {
        let text = raw_text.trim();
        if text.is_empty() {
            return false;
        }

        if self.selected_text.as_deref() != Some(text) {
            self.anchor.clear();
            self.results.clear();
        }
        self.selected_text = Some(text.to_string());
        true
    }

    /// Select the sentence around `cursor` when no explicit selection exists.
    /// Returns the untrimmed byte range that was considered.
    pub fn select_sentence_at(&mut self, cursor: usize) -> Range<usize> {
        let text = self.text();
        let range = sentence_at(&text, cursor);
        self.select(&text[range.clone()]);
        range
    }

    /// Format a citation for `doc` in the current style and splice it in after
    /// the selection and any citations already chained onto it. Returns the
    /// byte offset where the citation landed. With no resolvable selection the
    /// citation is appended at the end and the anchor is cleared.
    pub fn insert_citation(&mut self, doc: &SourceDoc) -> usize {
        let citation = format_citation(doc, self.style);
        let range = self
            .selected_text
            .as_deref()
            .and_then(|text| locate(&self.buffer, text, &self.anchor));

        let selected = self.selected_text.clone().unwrap_or_default();
        let insertion = insert_citation(&self.buffer, range, &selected, &citation);
        self.buffer = insertion.buffer;
        self.anchor = insertion.anchor;
        insertion.offset
    }

    /// Start a search: returns the text to hand to the search collaborator
    /// (the selection when one exists, the whole draft otherwise), or `None`
    /// when a search is already outstanding. The busy guard is a silent no-op,
    /// not an error; there is no cancellation.
    pub fn begin_search(&mut self) -> Option<String> {
        if self.search_pending {
            log::debug!("search already in flight, ignoring request");
            return None;
        }

        let query = match self.selected_text.clone() {
            Some(text) => text,
            None => self.text(),
        };
        if query.trim().is_empty() {
            return None;
        }

        self.search_pending = true;
        Some(query)
    }

    /// Resolve the outstanding search. An in-flight search always completes
    /// and its results overwrite the current set, even if the selection has
    /// since changed; an empty list is a valid, displayable state.
    pub fn finish_search(&mut self, results: Vec<SourceDoc>) {
        self.results = results;
        self.search_pending = false;
    }

    /// Drop the busy guard without touching the current results.
    pub fn abort_search(&mut self) {
        self.search_pending = false;
    }

    pub fn search_pending(&self) -> bool {
        self.search_pending
    }
}
