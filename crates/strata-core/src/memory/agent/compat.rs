//! Flat key-value contract over the insight store
//!
//! The namespace plays the role of the insight owner, so entries written
//! here are only visible through the same namespace.

use super::core::AgentMemory;
use crate::error::StrataResult;
use crate::memory::types::{Confidence, Insight, InsightQuery, MemoryEntry};

impl AgentMemory {
    /// Store `value` under `key` as a fully confident insight
    pub async fn store(
        &self,
        namespace: &str,
        key: &str,
        value: impl Into<String>,
    ) -> StrataResult<()> {
        let insight = Insight::new(key, value)
            .with_agent(namespace)
            .with_confidence(Confidence::CERTAIN);
        self.insights.store(insight).await?;
        Ok(())
    }

    /// Recall entries of `namespace` whose content contains `query`
    pub async fn recall(
        &self,
        namespace: &str,
        query: &str,
        limit: usize,
    ) -> StrataResult<Vec<MemoryEntry>> {
        let insights = self
            .insights
            .query(namespace, &InsightQuery::new().text(query).limit(limit))
            .await?;

        Ok(insights
            .into_iter()
            .map(|insight| {
                let mut entry = MemoryEntry::new(insight.id, insight.content, namespace);
                entry.created_at = insight.created_at;
                entry
            })
            .collect())
    }

    /// No-op: insights have no deletion path
    pub async fn delete(&self, namespace: &str, key: &str) -> StrataResult<()> {
        tracing::debug!(namespace, key, "delete is not supported for insights, ignoring");
        Ok(())
    }
}
