//! Bounded, priority-ordered context for generation calls
//!
//! Sections, in order: agent insights, workspace facts visible to the
//! caller's clearance, and recent episodes. Empty sections are omitted.
//! The joined text is cut to `token_budget * chars_per_token` characters.

use crate::config::AssemblerConfig;
use crate::memory::access::ClearanceProfile;
use crate::memory::agent::AgentMemory;
use crate::memory::types::{EpisodeQuery, FactQuery, InsightQuery};
use std::sync::Arc;

/// Optional hints narrowing what gets assembled
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryScope {
    pub entity: Option<String>,
    pub domain: Option<String>,
    pub tags: Vec<String>,
    /// Substring matched against insight and fact content
    pub query: Option<String>,
}

impl MemoryScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    fn insight_query(&self, limit: usize) -> InsightQuery {
        InsightQuery {
            entity: self.entity.clone(),
            domain: self.domain.clone(),
            tags: self.tags.clone(),
            text: self.query.clone(),
            limit,
        }
    }

    fn fact_query(&self, limit: usize) -> FactQuery {
        FactQuery {
            entity: self.entity.clone(),
            domain: self.domain.clone(),
            tags: self.tags.clone(),
            text: self.query.clone(),
            limit,
            ..FactQuery::default()
        }
    }

    fn episode_query(&self, limit: usize) -> EpisodeQuery {
        EpisodeQuery {
            entity: self.entity.clone(),
            domain: self.domain.clone(),
            tags: self.tags.clone(),
            since: None,
            limit,
        }
    }
}

/// Builds memory context strings for one agent and one clearance
pub struct MemoryAssembler {
    memory: Arc<AgentMemory>,
    clearance: ClearanceProfile,
    config: AssemblerConfig,
}

impl MemoryAssembler {
    pub fn new(memory: Arc<AgentMemory>, clearance: ClearanceProfile) -> Self {
        Self {
            memory,
            clearance,
            config: AssemblerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AssemblerConfig) -> Self {
        self.config = config;
        self
    }

    /// Assemble with the configured token budget
    pub async fn assemble_default(&self, scope: &MemoryScope) -> String {
        self.assemble(scope, self.config.token_budget).await
    }

    /// Assemble context for `scope`, at most `token_budget * chars_per_token` characters
    ///
    /// Store failures drop the affected section and are logged.
    pub async fn assemble(&self, scope: &MemoryScope, token_budget: usize) -> String {
        let mut parts: Vec<String> = Vec::new();

        match self
            .memory
            .recall_insights(&scope.insight_query(self.config.max_insights))
            .await
        {
            Ok(insights) if !insights.is_empty() => {
                let lines: Vec<String> = insights
                    .iter()
                    .map(|i| format!("- {} (confidence: {:.1})", i.content, i.confidence))
                    .collect();
                parts.push(format!("## Insights\n{}", lines.join("\n")));
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "skipping insights section"),
        }

        if let Some(workspace) = self.memory.workspace() {
            match workspace
                .query(&self.clearance, &scope.fact_query(self.config.max_facts))
                .await
            {
                Ok(facts) if !facts.is_empty() => {
                    let lines: Vec<String> =
                        facts.iter().map(|f| format!("- {}", f.content)).collect();
                    parts.push(format!("## Context\n{}", lines.join("\n")));
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "skipping workspace section"),
            }
        }

        match self
            .memory
            .recall_recent_episodes(&scope.episode_query(self.config.max_episodes))
            .await
        {
            Ok(episodes) if !episodes.is_empty() => {
                let lines: Vec<String> = episodes
                    .iter()
                    .map(|e| format!("- {}: {}", e.action, e.output_summary))
                    .collect();
                parts.push(format!("## Recent Activity\n{}", lines.join("\n")));
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "skipping recent activity section"),
        }

        let max_chars = token_budget.saturating_mul(self.config.chars_per_token);
        let assembled = truncate_chars(parts.join("\n\n"), max_chars);
        tracing::debug!(
            agent_id = %self.memory.agent_id(),
            sections = parts.len(),
            chars = assembled.chars().count(),
            "assembled memory context"
        );
        assembled
    }
}

/// Cut `text` to at most `max_chars` characters
pub fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if let Some((cut, _)) = text.char_indices().nth(max_chars) {
        text.truncate(cut);
    }
    text
}
