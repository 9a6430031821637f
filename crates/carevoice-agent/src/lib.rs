//! Healthcare voice assistant glue.
//!
//! The speech pipeline (VAD, STT, LLM, TTS, turn detection) belongs to an
//! external agent framework. This crate supplies what that framework calls
//! back into: the pre-inference hook that folds asset search results into
//! a bounded chat history, the pre-TTS word replacement, and metrics
//! collection, plus the configuration that ties them to the search index
//! and LiveKit.

pub mod config;
pub mod context;
pub mod error;
pub mod hooks;
pub mod metrics;
pub mod rehearsal;
pub mod replace;
pub mod settings;

pub use config::{load_config, Config, ConfigError, LoggingConfig};
pub use context::ContextManager;
pub use error::AgentError;
pub use hooks::{AssistantHooks, PipelineHooks, VoiceSessionDriver};
pub use metrics::{log_metrics, AgentMetrics, UsageCollector, UsageSummary};
pub use rehearsal::{RehearsalDriver, TurnReport};
pub use replace::WordReplacer;
pub use settings::AgentSettings;
