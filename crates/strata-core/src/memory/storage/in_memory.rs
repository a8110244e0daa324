//! In-memory storage implementations

use super::query::{episode_matches, fact_matches, insight_matches};
use super::r#trait::{EpisodicStore, FactStore, InsightStore};
use crate::error::StorageError;
use crate::memory::similarity::is_similar;
use crate::memory::types::{Episode, EpisodeQuery, Fact, FactQuery, Insight, InsightQuery};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Insert or replace by id, keeping the original position on replace
fn upsert<T>(records: &mut Vec<T>, record: T, id_of: impl Fn(&T) -> &str) {
    let id = id_of(&record).to_string();
    match records.iter_mut().find(|r| id_of(&**r) == id) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

/// Touch each fact named in `ids`, returning the touched copies in `ids` order
pub(super) fn touch_all(facts: &mut [Fact], ids: &[String]) -> Vec<Fact> {
    ids.iter()
        .filter_map(|id| {
            let fact = facts.iter_mut().find(|f| &f.id == id)?;
            fact.touch();
            Some(fact.clone())
        })
        .collect()
}

/// In-memory fact store (insertion ordered)
#[derive(Debug, Default)]
pub struct InMemoryFactStore {
    facts: Arc<RwLock<Vec<Fact>>>,
}

impl InMemoryFactStore {
    /// Create a new in-memory fact store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored facts
    pub async fn len(&self) -> usize {
        self.facts.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.facts.read().await.is_empty()
    }
}

#[async_trait]
impl FactStore for InMemoryFactStore {
    async fn store(&self, fact: Fact) -> Result<(), StorageError> {
        upsert(&mut *self.facts.write().await, fact, |f| f.id.as_str());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Fact>, StorageError> {
        Ok(self.facts.read().await.iter().find(|f| f.id == id).cloned())
    }

    async fn query(&self, query: &FactQuery) -> Result<Vec<Fact>, StorageError> {
        Ok(self
            .facts
            .read()
            .await
            .iter()
            .filter(|f| fact_matches(f, query))
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn update(&self, fact: Fact) -> Result<(), StorageError> {
        upsert(&mut *self.facts.write().await, fact, |f| f.id.as_str());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.facts.write().await.retain(|f| f.id != id);
        Ok(())
    }

    async fn record_access(&self, ids: &[String]) -> Result<Vec<Fact>, StorageError> {
        let mut facts = self.facts.write().await;
        Ok(touch_all(&mut facts, ids))
    }
}

/// In-memory episodic store, one append-only log per agent
///
/// Unbounded by default. With a per-agent cap the oldest episode of that
/// agent is evicted when a new one arrives.
#[derive(Debug, Default)]
pub struct InMemoryEpisodicStore {
    logs: Arc<RwLock<HashMap<String, Vec<Episode>>>>,
    max_per_agent: Option<usize>,
}

impl InMemoryEpisodicStore {
    /// Create a new unbounded episodic store
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap each agent's log at `max` episodes
    pub fn with_max_per_agent(mut self, max: usize) -> Self {
        self.max_per_agent = Some(max.max(1));
        self
    }

    /// Total number of stored episodes across all agents
    pub async fn len(&self) -> usize {
        self.logs.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl EpisodicStore for InMemoryEpisodicStore {
    async fn store(&self, episode: Episode) -> Result<(), StorageError> {
        let mut logs = self.logs.write().await;
        let log = logs.entry(episode.agent_id.clone()).or_default();

        if let Some(existing) = log.iter_mut().find(|e| e.id == episode.id) {
            *existing = episode;
            return Ok(());
        }

        if let Some(max) = self.max_per_agent {
            if log.len() >= max {
                let evicted = log.remove(0);
                tracing::debug!(
                    agent_id = %evicted.agent_id,
                    episode_id = %evicted.id,
                    "evicted oldest episode"
                );
            }
        }

        log.push(episode);
        Ok(())
    }

    async fn query(
        &self,
        agent_id: &str,
        query: &EpisodeQuery,
    ) -> Result<Vec<Episode>, StorageError> {
        let logs = self.logs.read().await;
        let Some(log) = logs.get(agent_id) else {
            return Ok(Vec::new());
        };
        Ok(log
            .iter()
            .filter(|e| episode_matches(e, agent_id, query))
            .take(query.limit)
            .cloned()
            .collect())
    }
}

/// In-memory insight store (insertion ordered)
#[derive(Debug, Default)]
pub struct InMemoryInsightStore {
    insights: Arc<RwLock<Vec<Insight>>>,
}

impl InMemoryInsightStore {
    /// Create a new in-memory insight store
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored insights across all agents
    pub async fn len(&self) -> usize {
        self.insights.read().await.len()
    }
}

#[async_trait]
impl InsightStore for InMemoryInsightStore {
    async fn store(&self, insight: Insight) -> Result<(), StorageError> {
        upsert(&mut *self.insights.write().await, insight, |i| i.id.as_str());
        Ok(())
    }

    async fn query(
        &self,
        agent_id: &str,
        query: &InsightQuery,
    ) -> Result<Vec<Insight>, StorageError> {
        Ok(self
            .insights
            .read()
            .await
            .iter()
            .filter(|i| insight_matches(i, agent_id, query))
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn update(&self, insight: Insight) -> Result<(), StorageError> {
        upsert(&mut *self.insights.write().await, insight, |i| i.id.as_str());
        Ok(())
    }

    async fn find_similar(
        &self,
        agent_id: &str,
        content: &str,
    ) -> Result<Option<Insight>, StorageError> {
        Ok(self
            .insights
            .read()
            .await
            .iter()
            .find(|i| i.agent_id == agent_id && is_similar(content, &i.content))
            .cloned())
    }
}
