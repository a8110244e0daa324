//! Store query filters
//!
//! Every filter is optional and all provided filters are ANDed. Empty strings
//! count as "no constraint", and `limit` truncates after filtering.

use chrono::{DateTime, Utc};

/// Default result limit for fact queries
pub const DEFAULT_FACT_LIMIT: usize = 10;
/// Default result limit for episode queries
pub const DEFAULT_EPISODE_LIMIT: usize = 50;
/// Default result limit for insight queries
pub const DEFAULT_INSIGHT_LIMIT: usize = 10;

/// Query for workspace facts
#[derive(Debug, Clone, PartialEq)]
pub struct FactQuery {
    pub entity: Option<String>,
    pub domain: Option<String>,
    /// Matches facts carrying any of these tags
    pub tags: Vec<String>,
    /// Case-insensitive substring of the content
    pub text: Option<String>,
    pub min_confidence: f32,
    pub limit: usize,
}

impl Default for FactQuery {
    fn default() -> Self {
        Self {
            entity: None,
            domain: None,
            tags: Vec::new(),
            text: None,
            min_confidence: 0.0,
            limit: DEFAULT_FACT_LIMIT,
        }
    }
}

impl FactQuery {
    /// Create a new query
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by entity
    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Filter by domain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Filter by tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Filter by any of several tags
    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(|t| t.into()));
        self
    }

    /// Search for text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set minimum confidence
    pub fn min_confidence(mut self, min: f32) -> Self {
        self.min_confidence = min;
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Query for an agent's episodes (the agent id is passed to the store separately)
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeQuery {
    pub entity: Option<String>,
    pub domain: Option<String>,
    pub tags: Vec<String>,
    /// Inclusive lower bound on the episode timestamp
    pub since: Option<DateTime<Utc>>,
    pub limit: usize,
}

impl Default for EpisodeQuery {
    fn default() -> Self {
        Self {
            entity: None,
            domain: None,
            tags: Vec::new(),
            since: None,
            limit: DEFAULT_EPISODE_LIMIT,
        }
    }
}

impl EpisodeQuery {
    /// Create a new query
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by entity
    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Filter by domain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Filter by tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Filter by any of several tags
    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(|t| t.into()));
        self
    }

    /// Only episodes at or after this time
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Query for an agent's insights (the agent id is passed to the store separately)
#[derive(Debug, Clone, PartialEq)]
pub struct InsightQuery {
    pub entity: Option<String>,
    pub domain: Option<String>,
    pub tags: Vec<String>,
    pub text: Option<String>,
    pub limit: usize,
}

impl Default for InsightQuery {
    fn default() -> Self {
        Self {
            entity: None,
            domain: None,
            tags: Vec::new(),
            text: None,
            limit: DEFAULT_INSIGHT_LIMIT,
        }
    }
}

impl InsightQuery {
    /// Create a new query
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by entity
    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Filter by domain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Filter by tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Filter by any of several tags
    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(|t| t.into()));
        self
    }

    /// Search for text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}
