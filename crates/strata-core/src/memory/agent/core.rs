//! Core agent memory implementation

use crate::config::{PublishConfig, ReflectionConfig, StrataConfig};
use crate::error::StrataResult;
use crate::memory::storage::{
    EpisodicStore, InMemoryEpisodicStore, InMemoryInsightStore, InsightStore,
};
use crate::memory::types::{Episode, EpisodeQuery, Insight, InsightQuery};
use crate::memory::workspace::WorkspaceMemory;
use std::sync::{Arc, Weak};

/// Memory of a single agent
pub struct AgentMemory {
    pub(crate) agent_id: String,
    pub(crate) workspace: Option<Weak<WorkspaceMemory>>,
    pub(crate) episodic: Arc<dyn EpisodicStore>,
    pub(crate) insights: Arc<dyn InsightStore>,
    pub(crate) reflection: ReflectionConfig,
    pub(crate) publish: PublishConfig,
}

impl AgentMemory {
    /// Create agent memory with in-memory stores and no workspace
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            workspace: None,
            episodic: Arc::new(InMemoryEpisodicStore::new()),
            insights: Arc::new(InMemoryInsightStore::new()),
            reflection: ReflectionConfig::default(),
            publish: PublishConfig::default(),
        }
    }

    /// Create agent memory with in-memory stores tuned by `config`
    pub fn from_config(agent_id: impl Into<String>, config: &StrataConfig) -> Self {
        let mut episodic = InMemoryEpisodicStore::new();
        if let Some(max) = config.episodic.max_episodes_per_agent {
            episodic = episodic.with_max_per_agent(max);
        }

        Self {
            episodic: Arc::new(episodic),
            reflection: config.reflection.clone(),
            publish: config.publish.clone(),
            ..Self::new(agent_id)
        }
    }

    /// Attach a shared workspace without taking ownership of it
    pub fn with_workspace(mut self, workspace: &Arc<WorkspaceMemory>) -> Self {
        self.workspace = Some(Arc::downgrade(workspace));
        self
    }

    /// Use a custom episodic store
    pub fn with_episodic_store(mut self, store: Arc<dyn EpisodicStore>) -> Self {
        self.episodic = store;
        self
    }

    /// Use a custom insight store
    pub fn with_insight_store(mut self, store: Arc<dyn InsightStore>) -> Self {
        self.insights = store;
        self
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// The attached workspace, if any is set and still alive
    pub fn workspace(&self) -> Option<Arc<WorkspaceMemory>> {
        self.workspace.as_ref().and_then(Weak::upgrade)
    }

    pub fn reflection_config(&self) -> &ReflectionConfig {
        &self.reflection
    }

    /// Record an episode under this agent
    pub async fn record_episode(&self, mut episode: Episode) -> StrataResult<()> {
        episode.agent_id = self.agent_id.clone();
        tracing::debug!(
            agent_id = %self.agent_id,
            episode_id = %episode.id,
            action = %episode.action,
            "recording episode"
        );
        self.episodic.store(episode).await?;
        Ok(())
    }

    /// Recall this agent's episodes, oldest first, keeping the first `query.limit`
    pub async fn recall_episodes(&self, query: &EpisodeQuery) -> StrataResult<Vec<Episode>> {
        Ok(self.episodic.query(&self.agent_id, query).await?)
    }

    /// Recall the newest `query.limit` matching episodes, oldest first
    pub async fn recall_recent_episodes(&self, query: &EpisodeQuery) -> StrataResult<Vec<Episode>> {
        Ok(self.episodic.recent(&self.agent_id, query).await?)
    }

    /// Recall this agent's insights in insertion order
    pub async fn recall_insights(&self, query: &InsightQuery) -> StrataResult<Vec<Insight>> {
        Ok(self.insights.query(&self.agent_id, query).await?)
    }

    /// Store an insight under this agent, replacing one with the same id
    pub async fn store_insight(&self, mut insight: Insight) -> StrataResult<()> {
        insight.agent_id = self.agent_id.clone();
        self.insights.store(insight).await?;
        Ok(())
    }
}
