/*!
 * # Editing Core Module
 *
 * The splice-and-anchor machinery underneath citation insertion.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: xi-rope Buffer
 * - The whole draft lives in one **`xi_rope::Rope`** wrapped by [`buffer::TextBuffer`]
 * - Every edit produces a *new* `TextBuffer` value; nothing mutates buffer
 *   internals in place, which keeps caret-restoration logic trivially testable
 *
 * ### 2. One Live Anchor
 * - A [`anchor::SelectionAnchor`] remembers the selected text and its last
 *   known byte offset so consecutive citations on the same selection chain
 *   contiguously instead of fragmenting
 * - The anchor is *advisory*: before use it is checked against the buffer and
 *   re-resolved by substring search when stale
 *
 * ### 3. Insertion as a Pure Function
 * - [`insert::insert_citation`] takes a buffer snapshot plus a resolved
 *   selection range and returns the spliced buffer, the refreshed anchor, and
 *   the offset where the citation landed
 * - When the selection can no longer be found the citation is appended at the
 *   end of the buffer and the anchor is cleared, never an error
 *
 * ## Module Structure
 *
 * - **`buffer`**: immutable `TextBuffer` snapshots with slice/splice/find
 * - **`anchor`**: `SelectionAnchor` and selection-to-range resolution
 * - **`insert`**: citation-token scanner and the chaining insertion algorithm
 * - **`sentence`**: sentence-boundary scan for "cite the current sentence"
 */

pub mod anchor;
pub mod buffer;
pub mod insert;
pub mod sentence;

pub use anchor::{SelectionAnchor, locate};
pub use buffer::TextBuffer;
pub use insert::{Insertion, insert_citation};
pub use sentence::sentence_at;
