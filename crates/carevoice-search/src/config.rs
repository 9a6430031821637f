use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_url() -> String {
    "http://127.0.0.1".to_string()
}

fn default_port() -> u16 {
    2222
}

fn default_schema() -> String {
    "asset".to_string()
}

fn default_target_hits() -> u32 {
    100_000
}

fn default_hits() -> u32 {
    1
}

fn default_ranking_profile() -> String {
    "transformer".to_string()
}

fn default_approximate_threshold() -> f64 {
    0.05
}

fn default_embedder() -> String {
    "mini".to_string()
}

fn default_tokenizer() -> String {
    "tokenizer".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Connection and ranking settings for the Vespa asset index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Scheme and host of the Vespa container, without port.
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Document type (schema) holding the assets.
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Document API namespace. Falls back to the schema name when unset.
    #[serde(default)]
    pub namespace: Option<String>,

    /// Candidate pool requested from the nearest-neighbour operator.
    #[serde(default = "default_target_hits")]
    pub target_hits: u32,

    /// Number of ranked hits returned to the caller.
    #[serde(default = "default_hits")]
    pub hits: u32,

    #[serde(default = "default_ranking_profile")]
    pub ranking_profile: String,

    #[serde(default)]
    pub post_filter_threshold: f64,

    #[serde(default = "default_approximate_threshold")]
    pub approximate_threshold: f64,

    /// Embedder id producing the dense query vector.
    #[serde(default = "default_embedder")]
    pub embedder: String,

    /// Embedder id producing the query token ids.
    #[serde(default = "default_tokenizer")]
    pub tokenizer: String,

    /// Per-request timeout. Zero disables it.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            port: default_port(),
            schema: default_schema(),
            namespace: None,
            target_hits: default_target_hits(),
            hits: default_hits(),
            ranking_profile: default_ranking_profile(),
            post_filter_threshold: 0.0,
            approximate_threshold: default_approximate_threshold(),
            embedder: default_embedder(),
            tokenizer: default_tokenizer(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SearchConfig {
    pub fn new(url: impl Into<String>, port: u16, schema: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            port,
            schema: schema.into(),
            ..Self::default()
        }
    }

    /// Base URL of the Vespa container, e.g. `http://127.0.0.1:2222`.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.url.trim_end_matches('/'), self.port)
    }

    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(&self.schema)
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_index_tuning() {
        let config = SearchConfig::default();
        assert_eq!(config.target_hits, 100_000);
        assert_eq!(config.hits, 1);
        assert_eq!(config.ranking_profile, "transformer");
        assert_eq!(config.post_filter_threshold, 0.0);
        assert_eq!(config.approximate_threshold, 0.05);
        assert_eq!(config.endpoint(), "http://127.0.0.1:2222");
    }

    #[test]
    fn namespace_falls_back_to_schema() {
        let mut config = SearchConfig::new("http://vespa/", 8080, "clinical");
        assert_eq!(config.namespace(), "clinical");
        assert_eq!(config.endpoint(), "http://vespa:8080");

        config.namespace = Some("prod".to_string());
        assert_eq!(config.namespace(), "prod");
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = SearchConfig {
            timeout_secs: 0,
            ..SearchConfig::default()
        };
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config: SearchConfig = toml::from_str(
            r#"
            url = "http://vespa.internal"
            hits = 3
            "#,
        )
        .expect("parse TOML");
        assert_eq!(config.hits, 3);
        assert_eq!(config.port, 2222);
        assert_eq!(config.embedder, "mini");
    }
}
