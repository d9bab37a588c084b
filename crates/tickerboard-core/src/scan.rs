//! Ticker candidate extraction from free-form chat text.
//!
//! A candidate is a run of 2 to 5 ASCII uppercase letters bounded by word
//! breaks. Candidates are only *candidates*: the catalog builder decides
//! which of them are real symbols.

use std::sync::LazyLock;

use regex::Regex;

use crate::chat::ChatMessage;

static TICKER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]{2,5}\b").expect("ticker pattern is valid"));

/// All candidate tokens in `text`, in order of appearance, duplicates kept.
pub fn extract_candidates(text: &str) -> Vec<String> {
    TICKER_PATTERN
        .find_iter(text)
        .map(|found| found.as_str().to_owned())
        .collect()
}

/// Candidates of every message, in message order (newest first as delivered
/// by the chat sources).
pub fn scan_messages(messages: &[ChatMessage]) -> Vec<String> {
    messages
        .iter()
        .flat_map(|message| extract_candidates(&message.text))
        .collect()
}

/// Drops repeated candidates, keeping the first occurrence of each.
pub fn dedup_candidates(candidates: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    candidates
        .iter()
        .filter(|candidate| seen.insert(candidate.as_str()))
        .cloned()
        .collect()
}
