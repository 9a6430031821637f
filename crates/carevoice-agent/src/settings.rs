use crate::error::AgentError;
use carevoice_types::{ChatContext, ChatMessage};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

fn default_system_prompt() -> String {
    "You are a voice assistant created by Prathap".to_string()
}

fn default_greeting() -> String {
    "Hey, how can I help you today?".to_string()
}

fn default_true() -> bool {
    true
}

fn default_llm_model() -> String {
    "gpt-4o".to_string()
}

fn default_stt_provider() -> String {
    "assemblyai".to_string()
}

fn default_tts_provider() -> String {
    "openai".to_string()
}

fn default_min_endpointing_delay() -> f64 {
    0.5
}

fn default_max_endpointing_delay() -> f64 {
    5.0
}

fn default_max_history() -> usize {
    15
}

fn default_word_replacements() -> BTreeMap<String, String> {
    BTreeMap::from([("jeeves".to_string(), "<<Agent Jeeves>>".to_string())])
}

/// How the voice pipeline is assembled for a session.
///
/// The model and provider names are handed to the external framework as-is.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentSettings {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Spoken once the participant has joined.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    #[serde(default = "default_true")]
    pub allow_interruptions: bool,

    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    #[serde(default = "default_stt_provider")]
    pub stt_provider: String,

    #[serde(default = "default_tts_provider")]
    pub tts_provider: String,

    /// Seconds to wait when the turn detector thinks the user is done.
    #[serde(default = "default_min_endpointing_delay")]
    pub min_endpointing_delay: f64,

    /// Seconds to wait when the turn detector thinks the user is not done.
    #[serde(default = "default_max_endpointing_delay")]
    pub max_endpointing_delay: f64,

    /// Chat history cap enforced before every LLM turn.
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Append a context message even when the search found nothing.
    #[serde(default = "default_true")]
    pub append_empty_results: bool,

    #[serde(default = "default_word_replacements")]
    pub word_replacements: BTreeMap<String, String>,

    /// Apply `word_replacements` to text before synthesis.
    #[serde(default)]
    pub replace_words_before_tts: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            greeting: default_greeting(),
            allow_interruptions: true,
            llm_model: default_llm_model(),
            stt_provider: default_stt_provider(),
            tts_provider: default_tts_provider(),
            min_endpointing_delay: default_min_endpointing_delay(),
            max_endpointing_delay: default_max_endpointing_delay(),
            max_history: default_max_history(),
            append_empty_results: true,
            word_replacements: default_word_replacements(),
            replace_words_before_tts: false,
        }
    }
}

impl AgentSettings {
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.max_history == 0 {
            return Err(AgentError::Settings(
                "max_history must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("min_endpointing_delay", self.min_endpointing_delay),
            ("max_endpointing_delay", self.max_endpointing_delay),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AgentError::Settings(format!(
                    "{name} must be a non-negative number of seconds"
                )));
            }
        }
        if self.min_endpointing_delay > self.max_endpointing_delay {
            return Err(AgentError::Settings(format!(
                "min_endpointing_delay ({}) exceeds max_endpointing_delay ({})",
                self.min_endpointing_delay, self.max_endpointing_delay
            )));
        }
        Ok(())
    }

    pub fn min_endpointing(&self) -> Duration {
        Duration::try_from_secs_f64(self.min_endpointing_delay).unwrap_or_default()
    }

    pub fn max_endpointing(&self) -> Duration {
        Duration::try_from_secs_f64(self.max_endpointing_delay).unwrap_or_default()
    }

    /// One-line description of the assembled pipeline, for operators.
    pub fn pipeline_summary(&self) -> String {
        format!(
            "stt={} llm={} tts={} interruptions={} endpointing={:?}..{:?}",
            self.stt_provider,
            self.llm_model,
            self.tts_provider,
            if self.allow_interruptions { "on" } else { "off" },
            self.min_endpointing(),
            self.max_endpointing(),
        )
    }

    /// History a new session starts from: just the system prompt.
    pub fn initial_context(&self) -> ChatContext {
        ChatContext::new().with_message(ChatMessage::system(&self.system_prompt))
    }
}
