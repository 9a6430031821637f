//! Callback surface between the voice framework and this crate.
//!
//! The framework owns the session loop. It is handed one [`PipelineHooks`]
//! object through [`VoiceSessionDriver::register_hooks`] and calls it at
//! fixed points: before each LLM inference, before each TTS synthesis, and
//! whenever a stage reports metrics.

use crate::context::ContextManager;
use crate::error::AgentError;
use crate::metrics::{log_metrics, AgentMetrics, UsageCollector};
use crate::replace::WordReplacer;
use crate::settings::AgentSettings;
use async_trait::async_trait;
use carevoice_search::SnippetSearch;
use carevoice_types::ChatContext;
use std::sync::Arc;

#[async_trait]
pub trait PipelineHooks: Send + Sync {
    /// Runs before the LLM sees `ctx` for this turn.
    async fn before_llm(&self, ctx: &mut ChatContext);

    /// Rewrites text about to be synthesised.
    fn before_tts(&self, text: &str) -> String {
        text.to_string()
    }

    fn on_metrics_collected(&self, metrics: &AgentMetrics);
}

/// A session runner that accepts hooks.
pub trait VoiceSessionDriver {
    fn register_hooks(&mut self, hooks: Arc<dyn PipelineHooks>);
}

/// The assistant's hooks: search-augmented context, optional word
/// replacement, and usage accounting.
pub struct AssistantHooks {
    context: ContextManager,
    replacer: Option<WordReplacer>,
    usage: Arc<UsageCollector>,
}

impl AssistantHooks {
    pub fn new(context: ContextManager) -> Self {
        Self {
            context,
            replacer: None,
            usage: Arc::new(UsageCollector::new()),
        }
    }

    pub fn with_replacer(mut self, replacer: WordReplacer) -> Self {
        self.replacer = Some(replacer);
        self
    }

    pub fn from_settings(
        search: Arc<dyn SnippetSearch>,
        settings: &AgentSettings,
    ) -> Result<Self, AgentError> {
        settings.validate()?;
        let hooks = Self::new(ContextManager::from_settings(search, settings));
        if settings.replace_words_before_tts {
            Ok(hooks.with_replacer(WordReplacer::new(&settings.word_replacements)?))
        } else {
            Ok(hooks)
        }
    }

    pub fn usage(&self) -> Arc<UsageCollector> {
        self.usage.clone()
    }
}

#[async_trait]
impl PipelineHooks for AssistantHooks {
    async fn before_llm(&self, ctx: &mut ChatContext) {
        self.context.before_llm(ctx).await;
    }

    fn before_tts(&self, text: &str) -> String {
        match &self.replacer {
            Some(replacer) => replacer.apply(text),
            None => text.to_string(),
        }
    }

    fn on_metrics_collected(&self, metrics: &AgentMetrics) {
        log_metrics(metrics);
        self.usage.collect(metrics);
    }
}
