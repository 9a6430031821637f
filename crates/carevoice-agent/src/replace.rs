use crate::error::AgentError;
use regex::{NoExpand, Regex};
use std::collections::BTreeMap;

/// Whole-word, case-insensitive substitutions applied to text before
/// synthesis, e.g. to mark a name for a custom pronunciation.
#[derive(Debug, Clone)]
pub struct WordReplacer {
    rules: Vec<(Regex, String)>,
}

impl WordReplacer {
    pub fn new(replacements: &BTreeMap<String, String>) -> Result<Self, AgentError> {
        let rules = replacements
            .iter()
            .filter(|(word, _)| !word.trim().is_empty())
            .map(|(word, replacement)| -> Result<(Regex, String), AgentError> {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(word.trim()));
                Ok((Regex::new(&pattern)?, replacement.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, (pattern, replacement)| {
                pattern
                    .replace_all(&acc, NoExpand(replacement.as_str()))
                    .into_owned()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jeeves() -> WordReplacer {
        WordReplacer::new(&BTreeMap::from([(
            "jeeves".to_string(),
            "<<Agent Jeeves>>".to_string(),
        )]))
        .unwrap()
    }

    #[test]
    fn replaces_whole_words_ignoring_case() {
        assert_eq!(jeeves().apply("Ask Jeeves."), "Ask <<Agent Jeeves>>.");
        assert_eq!(jeeves().apply("JEEVES, hello"), "<<Agent Jeeves>>, hello");
    }

    #[test]
    fn leaves_partial_matches_alone() {
        assert_eq!(jeeves().apply("jeevesy"), "jeevesy");
    }

    #[test]
    fn replacement_is_literal() {
        let replacer =
            WordReplacer::new(&BTreeMap::from([("cost".to_string(), "$1".to_string())])).unwrap();
        assert_eq!(replacer.apply("the cost"), "the $1");
    }

    #[test]
    fn blank_keys_are_ignored() {
        let replacer =
            WordReplacer::new(&BTreeMap::from([(" ".to_string(), "x".to_string())])).unwrap();
        assert!(replacer.is_empty());
        assert_eq!(replacer.apply("unchanged"), "unchanged");
    }
}
