use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

///
/// Tokenization policy
///
/// One shared, versioned algorithm used both when building keyword indexes
/// and when splitting client search terms, so the two sides can never drift
/// apart. Version 2 supersedes the historical field-search variant that
/// required a minimum token length of 3.
///

pub const TOKENIZER_POLICY_VERSION: u32 = 2;

/// Delimiter characters replaced by whitespace before splitting.
const DEFAULT_DELIMITERS: [char; 4] = [':', ',', ';', '\''];

/// Words never emitted as keyword tokens.
const DEFAULT_STOPWORDS: [&str; 9] = ["an", "to", "in", "on", "of", "and", "the", "was", "not"];

/// Minimum surviving token length, in characters.
const DEFAULT_MIN_TOKEN_LEN: usize = 2;

///
/// TokenizerConfig
///
/// Engine configuration, not per-document state. Initialized once at process
/// start and immutable thereafter; every keyword index and every client-side
/// re-derivation must share one instance (or equal instances with the same
/// `version`).
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TokenizerConfig {
    pub version: u32,
    pub delimiters: Vec<char>,
    pub stopwords: BTreeSet<String>,
    pub min_token_len: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            version: TOKENIZER_POLICY_VERSION,
            delimiters: DEFAULT_DELIMITERS.to_vec(),
            stopwords: DEFAULT_STOPWORDS.iter().map(ToString::to_string).collect(),
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
        }
    }
}

impl TokenizerConfig {
    /// Tokenize one text: lower-case, replace delimiters with whitespace,
    /// split on whitespace runs, drop short tokens and stop-words.
    ///
    /// Occurrences are preserved in order; a word appearing twice yields two
    /// tokens (fan-out-by-occurrence).
    #[must_use]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .map(|c| if self.delimiters.contains(&c) { ' ' } else { c })
            .collect();

        cleaned
            .split_whitespace()
            .filter(|token| self.accepts(token))
            .map(ToString::to_string)
            .collect()
    }

    /// Split a client search term with the same policy as the index build,
    /// deduplicated in first-seen order.
    #[must_use]
    pub fn search_terms(&self, term: &str) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.tokenize(term)
            .into_iter()
            .filter(|token| seen.insert(token.clone()))
            .collect()
    }

    fn accepts(&self, token: &str) -> bool {
        token.chars().count() >= self.min_token_len && !self.stopwords.contains(token)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_applies_case_delimiters_length_and_stopwords() {
        let config = TokenizerConfig::default();
        let tokens = config.tokenize("Order: Widgets, Widgets and Parts");

        // 'and' is a stop-word; both 'widgets' occurrences survive.
        assert_eq!(tokens, vec!["order", "widgets", "widgets", "parts"]);
    }

    #[test]
    fn tokenize_drops_single_character_fragments() {
        let config = TokenizerConfig::default();
        assert_eq!(config.tokenize("a X-ray"), vec!["x-ray"]);
    }

    #[test]
    fn tokenize_of_only_delimiters_is_empty() {
        let config = TokenizerConfig::default();
        assert!(config.tokenize(";;::,,''").is_empty());
    }

    #[test]
    fn search_terms_deduplicate_in_first_seen_order() {
        let config = TokenizerConfig::default();
        let terms = config.search_terms("Widgets and widgets; order");

        assert_eq!(terms, vec!["widgets", "order"]);
    }

    #[test]
    fn min_length_counts_characters_not_bytes() {
        let config = TokenizerConfig::default();
        assert_eq!(config.tokenize("åä"), vec!["åä"]);
    }
}
