//! Query matching functions shared by store backends

use crate::memory::types::{Episode, EpisodeQuery, Fact, FactQuery, Insight, InsightQuery};

/// Treat a missing or empty filter value as "no constraint"
fn constraint(filter: &Option<String>) -> Option<&str> {
    filter.as_deref().filter(|value| !value.is_empty())
}

fn matches_tags(required: &[String], has_tag: impl Fn(&str) -> bool) -> bool {
    required.is_empty() || required.iter().any(|t| has_tag(t))
}

fn contains_text(content: &str, text: &Option<String>) -> bool {
    match constraint(text) {
        Some(text) => content.to_lowercase().contains(&text.to_lowercase()),
        None => true,
    }
}

/// Check if a fact matches a query
pub fn fact_matches(fact: &Fact, query: &FactQuery) -> bool {
    if let Some(entity) = constraint(&query.entity) {
        if fact.entity != entity {
            return false;
        }
    }

    if let Some(domain) = constraint(&query.domain) {
        if fact.domain != domain {
            return false;
        }
    }

    if !matches_tags(&query.tags, |t| fact.has_tag(t)) {
        return false;
    }

    if !contains_text(&fact.content, &query.text) {
        return false;
    }

    fact.confidence.at_least(query.min_confidence)
}

/// Check if an episode belongs to `agent_id` and matches a query
pub fn episode_matches(episode: &Episode, agent_id: &str, query: &EpisodeQuery) -> bool {
    if episode.agent_id != agent_id {
        return false;
    }

    if let Some(entity) = constraint(&query.entity) {
        if episode.entity != entity {
            return false;
        }
    }

    if let Some(domain) = constraint(&query.domain) {
        if episode.domain != domain {
            return false;
        }
    }

    if !matches_tags(&query.tags, |t| episode.has_tag(t)) {
        return false;
    }

    match query.since {
        Some(since) => episode.timestamp >= since,
        None => true,
    }
}

/// Check if an insight belongs to `agent_id` and matches a query
pub fn insight_matches(insight: &Insight, agent_id: &str, query: &InsightQuery) -> bool {
    if insight.agent_id != agent_id {
        return false;
    }

    if let Some(entity) = constraint(&query.entity) {
        if insight.entity != entity {
            return false;
        }
    }

    if let Some(domain) = constraint(&query.domain) {
        if insight.domain != domain {
            return false;
        }
    }

    if !matches_tags(&query.tags, |t| insight.has_tag(t)) {
        return false;
    }

    contains_text(&insight.content, &query.text)
}
