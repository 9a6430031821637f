//! Parameterised construction of Vespa query requests.
//!
//! User speech ends up inside YQL and embed expressions as string literals,
//! so every value passes through [`QueryText`] first: control characters
//! (line breaks, tabs, form feeds from extracted documents) become spaces,
//! and quotes and backslashes are escaped. Identifiers taken from configuration
//! (schema, embedder ids) are checked against a strict character set.

use crate::config::SearchConfig;
use crate::error::SearchError;
use serde_json::{json, Value};

/// Free text that is safe to place inside a double-quoted query literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryText {
    escaped: String,
}

impl QueryText {
    pub fn new(raw: &str) -> Result<Self, SearchError> {
        let mut escaped = String::with_capacity(raw.len());
        for c in raw.chars() {
            match c {
                '"' => escaped.push_str("\\\""),
                '\\' => escaped.push_str("\\\\"),
                c if c.is_control() => escaped.push(' '),
                c => escaped.push(c),
            }
        }

        let trimmed = escaped.trim();
        if trimmed.is_empty() {
            return Err(SearchError::InvalidQuery("query text is empty".to_string()));
        }

        Ok(Self {
            escaped: trimmed.to_string(),
        })
    }

    /// The text wrapped in double quotes, ready to embed in YQL.
    pub fn literal(&self) -> String {
        format!("\"{}\"", self.escaped)
    }

    pub fn as_escaped(&self) -> &str {
        &self.escaped
    }
}

fn check_identifier(kind: &str, value: &str) -> Result<(), SearchError> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(SearchError::Config(format!("invalid {kind}: {value:?}")))
    }
}

/// Keyword-or-vector query over published assets.
#[derive(Debug)]
pub struct HybridQuery<'a> {
    config: &'a SearchConfig,
    text: QueryText,
}

impl<'a> HybridQuery<'a> {
    pub fn new(config: &'a SearchConfig, raw: &str) -> Result<Self, SearchError> {
        check_identifier("schema", &config.schema)?;
        check_identifier("ranking profile", &config.ranking_profile)?;
        check_identifier("embedder", &config.embedder)?;
        check_identifier("tokenizer", &config.tokenizer)?;

        Ok(Self {
            config,
            text: QueryText::new(raw)?,
        })
    }

    pub fn yql(&self) -> String {
        let literal = self.text.literal();
        format!(
            "select full_text from {schema} where status contains \"published\" \
             AND (title contains {literal} OR full_text contains {literal} OR \
             ({{targetHits:{target_hits}}}nearestNeighbor(paragraph_embeddings, q)))",
            schema = self.config.schema,
            target_hits = self.config.target_hits,
        )
    }

    /// Full request body for `POST /search/`.
    pub fn body(&self) -> Value {
        let literal = self.text.literal();
        json!({
            "yql": self.yql(),
            "input.query(q)": format!("embed({}, {})", self.config.embedder, literal),
            "input.query(query_token_ids)": format!("embed({}, {})", self.config.tokenizer, literal),
            "ranking.profile": self.config.ranking_profile,
            "ranking.matching.postFilterThreshold": self.config.post_filter_threshold,
            "ranking.matching.approximateThreshold": self.config.approximate_threshold,
            "hits": self.config.hits,
        })
    }
}
