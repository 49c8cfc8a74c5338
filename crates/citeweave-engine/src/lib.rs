pub mod citation;
pub mod editing;
pub mod render;
pub mod session;

// Re-export key types for easier usage
pub use citation::{CitationStyle, SourceDoc, format_citation};
pub use editing::{anchor::SelectionAnchor, buffer::TextBuffer, insert::Insertion};
pub use session::EditingSession;
