//! Store trait definitions
//!
//! Each store is a narrow interface with an in-memory reference backend.
//! A persistent backend implements the same trait and must keep the field
//! sets and filter semantics of the in-memory one.

use crate::error::StorageError;
use crate::memory::types::{Episode, EpisodeQuery, Fact, FactQuery, Insight, InsightQuery};
use async_trait::async_trait;

/// Storage for workspace facts
#[async_trait]
pub trait FactStore: Send + Sync {
    /// Store a fact, replacing any fact with the same id
    async fn store(&self, fact: Fact) -> Result<(), StorageError>;

    /// Get a fact by id
    async fn get(&self, id: &str) -> Result<Option<Fact>, StorageError>;

    /// Query facts in insertion order
    async fn query(&self, query: &FactQuery) -> Result<Vec<Fact>, StorageError>;

    /// Replace a fact by id
    async fn update(&self, fact: Fact) -> Result<(), StorageError>;

    /// Delete a fact; deleting a missing id is not an error
    async fn delete(&self, id: &str) -> Result<(), StorageError>;

    /// Record one read access on each fact in `ids` as a single atomic write
    ///
    /// Returns the updated facts in `ids` order. Unknown ids are skipped.
    async fn record_access(&self, ids: &[String]) -> Result<Vec<Fact>, StorageError>;
}

/// Append-only storage for agent episodes
#[async_trait]
pub trait EpisodicStore: Send + Sync {
    /// Append an episode; an id already in the agent's log is overwritten in place
    async fn store(&self, episode: Episode) -> Result<(), StorageError>;

    /// Query an agent's episodes, oldest first, keeping the first `query.limit`
    async fn query(&self, agent_id: &str, query: &EpisodeQuery)
    -> Result<Vec<Episode>, StorageError>;

    /// Query an agent's episodes, oldest first, keeping the newest `query.limit`
    async fn recent(
        &self,
        agent_id: &str,
        query: &EpisodeQuery,
    ) -> Result<Vec<Episode>, StorageError> {
        let unbounded = EpisodeQuery {
            limit: usize::MAX,
            ..query.clone()
        };
        let mut episodes = self.query(agent_id, &unbounded).await?;
        let skip = episodes.len().saturating_sub(query.limit);
        episodes.drain(..skip);
        Ok(episodes)
    }
}

/// Storage for agent insights
#[async_trait]
pub trait InsightStore: Send + Sync {
    /// Store an insight, replacing any insight with the same id
    async fn store(&self, insight: Insight) -> Result<(), StorageError>;

    /// Query an agent's insights in insertion order
    async fn query(&self, agent_id: &str, query: &InsightQuery)
    -> Result<Vec<Insight>, StorageError>;

    /// Replace an insight by id
    async fn update(&self, insight: Insight) -> Result<(), StorageError>;

    /// Find the first insight of `agent_id` that restates `content`
    async fn find_similar(
        &self,
        agent_id: &str,
        content: &str,
    ) -> Result<Option<Insight>, StorageError>;
}
