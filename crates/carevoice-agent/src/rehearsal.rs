//! Text-only session driver for exercising the hooks without audio.
//!
//! Each user utterance is appended to the history and the pre-inference
//! hook runs exactly as it would in a live session. No model is called;
//! the report shows what the model would have been given.

use crate::error::AgentError;
use crate::hooks::{PipelineHooks, VoiceSessionDriver};
use carevoice_types::{ChatContext, ChatMessage, Role};
use std::sync::Arc;

/// Outcome of one rehearsed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    /// Context appended by the hook, if any.
    pub retrieved: Option<String>,
    pub history_len: usize,
}

pub struct RehearsalDriver {
    context: ChatContext,
    hooks: Option<Arc<dyn PipelineHooks>>,
}

impl RehearsalDriver {
    pub fn new(initial: ChatContext) -> Self {
        Self {
            context: initial,
            hooks: None,
        }
    }

    pub fn context(&self) -> &ChatContext {
        &self.context
    }

    fn hooks(&self) -> Result<Arc<dyn PipelineHooks>, AgentError> {
        self.hooks.clone().ok_or(AgentError::HooksNotRegistered)
    }

    /// Records the assistant's greeting and returns the text that would be
    /// sent to TTS.
    pub fn greet(&mut self, greeting: &str) -> Result<String, AgentError> {
        let hooks = self.hooks()?;
        self.context.push(ChatMessage::assistant(greeting));
        Ok(hooks.before_tts(greeting))
    }

    pub async fn user_turn(&mut self, utterance: &str) -> Result<TurnReport, AgentError> {
        let hooks = self.hooks()?;
        self.context.push(ChatMessage::user(utterance));
        hooks.before_llm(&mut self.context).await;

        let retrieved = self
            .context
            .last()
            .filter(|message| message.role() == Role::System)
            .map(|message| message.content().to_string());

        Ok(TurnReport {
            retrieved,
            history_len: self.context.len(),
        })
    }
}

impl VoiceSessionDriver for RehearsalDriver {
    fn register_hooks(&mut self, hooks: Arc<dyn PipelineHooks>) {
        self.hooks = Some(hooks);
    }
}
