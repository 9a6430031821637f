//! Document search against the Vespa asset index.
//!
//! Two lookups are supported: a direct fetch of one document by id, and a
//! hybrid query that combines keyword matching on `title`/`full_text` with
//! an approximate nearest-neighbour match on paragraph embeddings. Both
//! return plain text snippets taken from the `full_text` field.
//!
//! Errors are never absorbed here. Callers that must not fail (the
//! pre-inference hook) decide how to degrade.

pub mod client;
pub mod config;
pub mod error;
pub mod query;

pub use client::{SnippetSearch, VespaClient};
pub use config::SearchConfig;
pub use error::SearchError;
pub use query::{HybridQuery, QueryText};
