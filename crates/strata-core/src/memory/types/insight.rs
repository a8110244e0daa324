//! Insights: patterns derived from multiple episodes

use super::confidence::Confidence;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status assigned to new insights
pub const DEFAULT_INSIGHT_STATUS: &str = "active";

/// Higher-order observation derived from episodes, with reinforcement-based confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub id: String,
    /// Owning agent, stamped by the agent memory on store
    pub agent_id: String,
    pub content: String,
    pub confidence: Confidence,
    /// Number of observations backing this insight (always >= 1)
    pub evidence_count: u32,
    #[serde(default)]
    pub source_episode_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// When the insight was last re-observed
    #[serde(default)]
    pub last_confirmed: Option<DateTime<Utc>>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub entity: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_status() -> String {
    DEFAULT_INSIGHT_STATUS.to_string()
}

impl Insight {
    /// Create a new active insight with one piece of evidence
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            agent_id: String::new(),
            content: content.into(),
            confidence: Confidence::default(),
            evidence_count: 1,
            source_episode_ids: Vec::new(),
            created_at: Utc::now(),
            last_confirmed: None,
            status: default_status(),
            entity: String::new(),
            domain: String::new(),
            tags: Vec::new(),
        }
    }

    /// Set the owning agent
    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = agent_id.into();
        self
    }

    /// Set confidence (clamped to 0.0-1.0)
    pub fn with_confidence(mut self, confidence: impl Into<Confidence>) -> Self {
        self.confidence = confidence.into();
        self
    }

    /// Set the episodes this insight was derived from
    pub fn with_source_episodes(
        mut self,
        ids: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.source_episode_ids = ids.into_iter().map(|id| id.into()).collect();
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

    /// Check if the insight carries a tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Re-observe this insight: bump confidence by `step` (capped at 1.0),
    /// count one more piece of evidence, and stamp the confirmation time
    pub fn reinforce(&mut self, step: f32) {
        self.confidence.reinforce(step);
        self.evidence_count += 1;
        self.last_confirmed = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_defaults() {
        let ins = Insight::new("ins_1", "Webinar leads convert better");
        assert_eq!(ins.status, DEFAULT_INSIGHT_STATUS);
        assert_eq!(ins.evidence_count, 1);
        assert_eq!(ins.confidence.value(), 0.5);
        assert!(ins.last_confirmed.is_none());
    }

    #[test]
    fn test_reinforce() {
        let mut ins = Insight::new("ins_2", "x").with_confidence(0.95);
        ins.reinforce(0.1);
        assert_eq!(ins.confidence.value(), 1.0);
        assert_eq!(ins.evidence_count, 2);
        assert!(ins.last_confirmed.is_some());
    }

    #[test]
    fn test_deserialize_without_status() {
        let json = r#"{
            "id": "ins_3",
            "agent_id": "cro",
            "content": "VP sponsor predicts conversion",
            "confidence": 0.8,
            "evidence_count": 2,
            "created_at": "2026-01-01T00:00:00Z"
        }"#;
        let ins: Insight = serde_json::from_str(json).unwrap();
        assert_eq!(ins.status, "active");
        assert!(ins.source_episode_ids.is_empty());
    }
}
