//! Promoting insights into the shared workspace

use super::core::AgentMemory;
use crate::error::StrataResult;
use crate::memory::types::{Classification, Fact, InsightQuery};

impl AgentMemory {
    /// Publish insights with confidence at or above `min_confidence` as facts
    ///
    /// Each published fact gets id `pub_{insight id}`, this agent as source,
    /// and internal classification. Every insight the agent owns is considered.
    /// Returns nothing when no workspace is attached or it has been dropped.
    pub async fn publish_to_workspace(&self, min_confidence: f32) -> StrataResult<Vec<Fact>> {
        let Some(workspace) = self.workspace() else {
            tracing::debug!(
                agent_id = %self.agent_id,
                "no workspace attached, skipping publish"
            );
            return Ok(Vec::new());
        };

        let insights = self
            .insights
            .query(&self.agent_id, &InsightQuery::new().limit(usize::MAX))
            .await?;

        let mut published = Vec::new();
        for insight in insights
            .into_iter()
            .filter(|insight| insight.confidence.at_least(min_confidence))
        {
            let fact = Fact::new(format!("pub_{}", insight.id), insight.content)
                .with_source(self.agent_id.clone())
                .with_confidence(insight.confidence)
                .with_entity(insight.entity)
                .with_domain(insight.domain)
                .with_tags(insight.tags)
                .with_classification(Classification::Internal);
            workspace.store_fact(fact.clone()).await?;
            published.push(fact);
        }

        tracing::info!(
            agent_id = %self.agent_id,
            published = published.len(),
            "published insights to workspace"
        );
        Ok(published)
    }

    /// Publish using the configured confidence threshold
    pub async fn publish(&self) -> StrataResult<Vec<Fact>> {
        self.publish_to_workspace(self.publish.min_confidence).await
    }
}
