//! Text heuristics used by reflection
//!
//! Both functions are deliberately simple approximations: word-set overlap
//! instead of semantic similarity, and fence stripping instead of a real
//! JSON extractor. Callers go through these names only, so either can be
//! replaced without touching call sites.

use std::collections::HashSet;

/// Overlap required for two texts to count as the same insight
pub const MIN_SHARED_WORDS: usize = 3;

fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Number of distinct lowercase words shared by `a` and `b`
pub fn word_overlap(a: &str, b: &str) -> usize {
    let a_words = word_set(a);
    let b_words = word_set(b);
    a_words.intersection(&b_words).count()
}

/// Check whether `candidate` restates `query`
///
/// A match needs at least `min(3, number of distinct words in query)` shared
/// words. An empty query never matches.
pub fn is_similar(query: &str, candidate: &str) -> bool {
    let query_words = word_set(query);
    if query_words.is_empty() {
        return false;
    }
    let candidate_words = word_set(candidate);
    let overlap = query_words.intersection(&candidate_words).count();
    overlap >= MIN_SHARED_WORDS.min(query_words.len())
}

/// Strip Markdown code fences (```json ... ```) from generated text
pub fn strip_code_fences(text: &str) -> &str {
    let mut stripped = text.trim();
    if let Some(rest) = stripped.strip_prefix("```") {
        // Drop the opening fence line, including any language tag
        stripped = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest,
        };
    }
    if let Some(rest) = stripped.strip_suffix("```") {
        stripped = rest;
    }
    stripped.trim()
}
