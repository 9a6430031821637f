//! Pipeline metrics as reported by the voice framework.
//!
//! Each event is logged as one structured line and folded into a running
//! usage summary for the session, which is what billing and capacity
//! estimates are based on.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// One metrics event emitted by a pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentMetrics {
    Llm {
        request_id: String,
        ttft_secs: f64,
        duration_secs: f64,
        prompt_tokens: u64,
        completion_tokens: u64,
    },
    Stt {
        request_id: String,
        duration_secs: f64,
        audio_duration_secs: f64,
        streamed: bool,
    },
    Tts {
        request_id: String,
        ttfb_secs: f64,
        duration_secs: f64,
        audio_duration_secs: f64,
        characters_count: u64,
    },
    /// End-of-utterance detection.
    Eou {
        end_of_utterance_delay_secs: f64,
        transcription_delay_secs: f64,
    },
    Vad {
        inference_count: u64,
        inference_duration_total_secs: f64,
    },
}

/// Writes one log line describing `metrics`.
pub fn log_metrics(metrics: &AgentMetrics) {
    match metrics {
        AgentMetrics::Llm {
            request_id,
            ttft_secs,
            duration_secs,
            prompt_tokens,
            completion_tokens,
        } => {
            let tokens_per_second = if *duration_secs > 0.0 {
                *completion_tokens as f64 / duration_secs
            } else {
                0.0
            };
            info!(
                request_id = %request_id,
                ttft = ttft_secs,
                duration = duration_secs,
                prompt_tokens,
                completion_tokens,
                tokens_per_second,
                "LLM metrics"
            );
        }
        AgentMetrics::Stt {
            request_id,
            duration_secs,
            audio_duration_secs,
            streamed,
        } => info!(
            request_id = %request_id,
            duration = duration_secs,
            audio_duration = audio_duration_secs,
            streamed,
            "STT metrics"
        ),
        AgentMetrics::Tts {
            request_id,
            ttfb_secs,
            duration_secs,
            audio_duration_secs,
            characters_count,
        } => info!(
            request_id = %request_id,
            ttfb = ttfb_secs,
            duration = duration_secs,
            audio_duration = audio_duration_secs,
            characters_count,
            "TTS metrics"
        ),
        AgentMetrics::Eou {
            end_of_utterance_delay_secs,
            transcription_delay_secs,
        } => info!(
            end_of_utterance_delay = end_of_utterance_delay_secs,
            transcription_delay = transcription_delay_secs,
            "EOU metrics"
        ),
        AgentMetrics::Vad {
            inference_count,
            inference_duration_total_secs,
        } => tracing::debug!(
            inference_count,
            inference_duration_total = inference_duration_total_secs,
            "VAD metrics"
        ),
    }
}

/// Totals accumulated over a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UsageSummary {
    pub llm_prompt_tokens: u64,
    pub llm_completion_tokens: u64,
    pub tts_characters_count: u64,
    pub stt_audio_duration_secs: f64,
}

#[derive(Debug, Default)]
pub struct UsageCollector {
    summary: Mutex<UsageSummary>,
}

impl UsageCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(&self, metrics: &AgentMetrics) {
        let mut summary = self.summary.lock().unwrap_or_else(PoisonError::into_inner);
        match metrics {
            AgentMetrics::Llm {
                prompt_tokens,
                completion_tokens,
                ..
            } => {
                summary.llm_prompt_tokens += prompt_tokens;
                summary.llm_completion_tokens += completion_tokens;
            }
            AgentMetrics::Tts {
                characters_count, ..
            } => summary.tts_characters_count += characters_count,
            AgentMetrics::Stt {
                audio_duration_secs,
                ..
            } => summary.stt_audio_duration_secs += audio_duration_secs,
            AgentMetrics::Eou { .. } | AgentMetrics::Vad { .. } => {}
        }
    }

    pub fn summary(&self) -> UsageSummary {
        *self.summary.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llm(prompt: u64, completion: u64) -> AgentMetrics {
        AgentMetrics::Llm {
            request_id: "req".to_string(),
            ttft_secs: 0.3,
            duration_secs: 1.2,
            prompt_tokens: prompt,
            completion_tokens: completion,
        }
    }

    #[test]
    fn collects_across_stages() {
        let collector = UsageCollector::new();
        collector.collect(&llm(100, 20));
        collector.collect(&llm(50, 5));
        collector.collect(&AgentMetrics::Tts {
            request_id: "tts".to_string(),
            ttfb_secs: 0.1,
            duration_secs: 0.8,
            audio_duration_secs: 2.0,
            characters_count: 42,
        });
        collector.collect(&AgentMetrics::Stt {
            request_id: "stt".to_string(),
            duration_secs: 0.0,
            audio_duration_secs: 3.5,
            streamed: true,
        });
        collector.collect(&AgentMetrics::Vad {
            inference_count: 10,
            inference_duration_total_secs: 0.02,
        });

        let summary = collector.summary();
        assert_eq!(summary.llm_prompt_tokens, 150);
        assert_eq!(summary.llm_completion_tokens, 25);
        assert_eq!(summary.tts_characters_count, 42);
        assert_eq!(summary.stt_audio_duration_secs, 3.5);
    }

    #[test]
    fn empty_collector_reports_zero() {
        assert_eq!(UsageCollector::new().summary(), UsageSummary::default());
    }

    #[test]
    fn metrics_deserialize_from_tagged_json() {
        let metrics: AgentMetrics = serde_json::from_str(
            r#"{"type":"eou","end_of_utterance_delay_secs":0.6,"transcription_delay_secs":0.2}"#,
        )
        .unwrap();
        assert!(matches!(metrics, AgentMetrics::Eou { .. }));
    }
}
