//! Episodes: one record per agent action

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Structured record of a single agent action
///
/// Episodes are append-only: once stored they are never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    /// Owning agent, stamped by the agent memory on record
    pub agent_id: String,
    pub operator_id: String,
    pub node_name: String,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub input_summary: String,
    pub output_summary: String,
    /// Structured outcome of the action
    #[serde(default)]
    pub outcome: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub tokens_in: u32,
    #[serde(default)]
    pub tokens_out: u32,
    #[serde(default)]
    pub entity: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Episode {
    /// Create a new episode timestamped now
    pub fn new(id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            agent_id: String::new(),
            operator_id: String::new(),
            node_name: String::new(),
            timestamp: Utc::now(),
            action: action.into(),
            input_summary: String::new(),
            output_summary: String::new(),
            outcome: HashMap::new(),
            duration_ms: 0,
            tokens_in: 0,
            tokens_out: 0,
            entity: String::new(),
            domain: String::new(),
            tags: Vec::new(),
        }
    }

    /// Set the operator and node that produced the episode
    pub fn with_operator(
        mut self,
        operator_id: impl Into<String>,
        node_name: impl Into<String>,
    ) -> Self {
        self.operator_id = operator_id.into();
        self.node_name = node_name.into();
        self
    }

    /// Set input and output summaries
    pub fn with_summaries(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.input_summary = input.into();
        self.output_summary = output.into();
        self
    }

    /// Add an outcome field
    pub fn with_outcome(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.outcome.insert(key.into(), value.into());
        self
    }

    /// Set duration in milliseconds
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set token counts
    pub fn with_tokens(mut self, tokens_in: u32, tokens_out: u32) -> Self {
        self.tokens_in = tokens_in;
        self.tokens_out = tokens_out;
        self
    }

    /// Set the entity
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = entity.into();
        self
    }

    /// Set the domain
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set tags
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(|t| t.into()).collect();
        self
    }

    /// Override the timestamp
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Check if the episode carries a tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
