//! Workspace-level facts

use super::base::Classification;
use super::confidence::Confidence;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Atomic, addressable unit of knowledge held by the shared workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// Unique identifier
    pub id: String,
    /// The knowledge itself
    pub content: String,
    /// Entity this fact is about (company, person, deal, ...)
    #[serde(default)]
    pub entity: String,
    /// Knowledge domain, also the key for clearance lookups
    #[serde(default)]
    pub domain: String,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Confidence (0.0 - 1.0)
    #[serde(default = "certain")]
    pub confidence: Confidence,
    /// Relative importance
    #[serde(default)]
    pub importance: f32,
    /// Number of times the fact was returned by a workspace query
    #[serde(default)]
    pub access_count: u32,
    /// When the fact was last returned by a workspace query
    #[serde(default)]
    pub last_accessed: Option<DateTime<Utc>>,
    /// Access classification
    #[serde(default)]
    pub classification: Classification,
    /// Who produced this fact (agent id, import job, ...)
    #[serde(default)]
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Id of the fact this one replaces
    #[serde(default)]
    pub supersedes: Option<String>,
}

fn certain() -> Confidence {
    Confidence::CERTAIN
}

impl Fact {
    /// Create a new internal fact with full confidence
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            content: content.into(),
            entity: String::new(),
            domain: String::new(),
            tags: Vec::new(),
            confidence: Confidence::CERTAIN,
            importance: 0.0,
            access_count: 0,
            last_accessed: None,
            classification: Classification::Internal,
            source: String::new(),
            created_at: now,
            updated_at: now,
            supersedes: None,
        }
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

    /// Set confidence (clamped to 0.0-1.0)
    pub fn with_confidence(mut self, confidence: impl Into<Confidence>) -> Self {
        self.confidence = confidence.into();
        self
    }

    /// Set importance
    pub fn with_importance(mut self, importance: f32) -> Self {
        self.importance = importance;
        self
    }

    /// Set classification
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
    }

    /// Set source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Mark this fact as replacing another one
    pub fn superseding(mut self, previous_id: impl Into<String>) -> Self {
        self.supersedes = Some(previous_id.into());
        self
    }

    /// Check if the fact carries a tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Record a read access
    pub fn touch(&mut self) {
        self.last_accessed = Some(Utc::now());
        self.access_count += 1;
    }
}
