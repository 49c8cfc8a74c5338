//! External collaborators consumed through narrow functional interfaces:
//! a neural search provider for scholarly sources and an LLM completion
//! endpoint for drafting continuation text. The editing core never sees an
//! error from the search path; failures degrade to a fixed sample result set.

pub mod completion;
pub mod search;

pub use completion::CompletionClient;
pub use search::{SearchClient, build_search_query, sample_results};
