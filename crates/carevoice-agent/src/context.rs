//! Search-augmented chat history.
//!
//! Before every LLM turn the whole conversation is used as a search query
//! against the asset index, the hits are appended as a system message, and
//! the history is cut back to its cap. A failing search never fails the
//! turn: it is logged and the turn goes ahead without new context.

use crate::settings::AgentSettings;
use carevoice_search::SnippetSearch;
use carevoice_types::{ChatContext, ChatMessage};
use std::sync::Arc;
use tracing::{debug, error};

/// Joins snippets into the appended context message.
pub const SNIPPET_DELIMITER: &str = ". ";

pub const DEFAULT_MAX_MESSAGES: usize = 15;

pub struct ContextManager {
    search: Arc<dyn SnippetSearch>,
    max_messages: usize,
    append_empty_results: bool,
}

impl ContextManager {
    pub fn new(search: Arc<dyn SnippetSearch>) -> Self {
        Self {
            search,
            max_messages: DEFAULT_MAX_MESSAGES,
            append_empty_results: true,
        }
    }

    pub fn from_settings(search: Arc<dyn SnippetSearch>, settings: &AgentSettings) -> Self {
        Self::new(search)
            .with_max_messages(settings.max_history)
            .with_append_empty_results(settings.append_empty_results)
    }

    /// Sets the history cap. Values below one are raised to one.
    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.max_messages = max_messages.max(1);
        self
    }

    /// When `false`, a search with no hits leaves the history untouched
    /// instead of appending an empty message.
    pub fn with_append_empty_results(mut self, append: bool) -> Self {
        self.append_empty_results = append;
        self
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    /// Pre-inference hook: augment `ctx` with search results, then cap it.
    ///
    /// Taking `&mut` means one session's history can only be in one turn at
    /// a time.
    pub async fn before_llm(&self, ctx: &mut ChatContext) {
        let query = ctx.joined_content(" ");

        match self.search.search(&query).await {
            Ok(snippets) => {
                if !snippets.is_empty() || self.append_empty_results {
                    debug!(snippets = snippets.len(), "appending retrieved context");
                    ctx.push(ChatMessage::system(snippets.join(SNIPPET_DELIMITER)));
                }
            }
            Err(e) => error!(error = %e, "Error fetching asset data"),
        }

        let dropped = ctx.retain_recent(self.max_messages);
        if dropped > 0 {
            debug!(dropped, kept = ctx.len(), "truncated chat context");
        }
    }
}
