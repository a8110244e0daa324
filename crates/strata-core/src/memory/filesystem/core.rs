//! Filesystem operations

use super::paths::{
    DIRECTORY_FILE, SOUL_FILE, Section, dir_domain, domain_dir, normalize, section_of, segments,
};
use crate::config::FilesystemConfig;
use crate::memory::agent::AgentMemory;
use crate::memory::types::{
    Confidence, Episode, EpisodeQuery, Insight, InsightQuery, RetrievalTrace, TraceAction,
    short_id,
};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

/// Characters counted per token in read traces
const CHARS_PER_TOKEN: usize = 4;

/// Newest episodes shown when listing `/experience/`
pub(super) const LISTING_LIMIT: usize = 50;

/// One search result
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub path: String,
    pub content: String,
    /// Set for insights, absent for episodes
    pub confidence: Option<Confidence>,
}

/// Optional fields for [`MemoryFilesystem::write`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteMetadata {
    /// Insight confidence; the configured default when absent
    pub confidence: Option<f32>,
    pub operator_id: Option<String>,
    pub node_name: Option<String>,
    /// Episode domain
    pub domain: Option<String>,
}

impl WriteMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn operator(
        mut self,
        operator_id: impl Into<String>,
        node_name: impl Into<String>,
    ) -> Self {
        self.operator_id = Some(operator_id.into());
        self.node_name = Some(node_name.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

/// Path-addressed view of one agent's memory
pub struct MemoryFilesystem {
    pub(super) memory: Arc<AgentMemory>,
    pub(super) soul: String,
    pub(super) config: FilesystemConfig,
    traces: Mutex<Vec<RetrievalTrace>>,
}

impl MemoryFilesystem {
    pub fn new(memory: Arc<AgentMemory>) -> Self {
        Self {
            memory,
            soul: String::new(),
            config: FilesystemConfig::default(),
            traces: Mutex::new(Vec::new()),
        }
    }

    /// Serve `soul` at `/identity/soul.md`
    pub fn with_soul(mut self, soul: impl Into<String>) -> Self {
        self.soul = soul.into();
        self
    }

    pub fn with_config(mut self, config: FilesystemConfig) -> Self {
        self.config = config;
        self
    }

    /// Snapshot of recorded traces, oldest first
    pub fn traces(&self) -> Vec<RetrievalTrace> {
        self.traces.lock().clone()
    }

    pub fn clear_traces(&self) {
        self.traces.lock().clear();
    }

    fn record(&self, trace: RetrievalTrace) {
        tracing::trace!(
            action = %trace.action,
            path = %trace.path,
            results = trace.results_count,
            "memory access"
        );
        self.traces.lock().push(trace);
    }

    /// List entries at `path`; unknown paths list nothing
    pub async fn browse(&self, path: &str) -> Vec<String> {
        let start = Instant::now();
        let normalized = normalize(path);
        let parts = segments(normalized);

        let entries = match section_of(&parts) {
            None if parts.is_empty() => Section::ALL.iter().map(|s| s.to_string()).collect(),
            None => Vec::new(),
            Some(Section::Identity) => {
                if self.soul.is_empty() {
                    Vec::new()
                } else {
                    vec![SOUL_FILE.to_string()]
                }
            }
            Some(Section::Knowledge) => self.browse_knowledge(&parts[1..]).await,
            Some(Section::Experience) => self
                .recent_episodes(LISTING_LIMIT)
                .await
                .into_iter()
                .map(|e| e.id)
                .collect(),
            Some(Section::References) => Vec::new(),
        };

        let trace_path = if normalized.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", normalized)
        };
        self.record(
            RetrievalTrace::new(TraceAction::Browse, trace_path)
                .with_results(entries.len())
                .with_duration(start.elapsed()),
        );
        entries
    }

    async fn browse_knowledge(&self, parts: &[&str]) -> Vec<String> {
        match parts.first() {
            None => {
                let domains: BTreeSet<String> = self
                    .insights(InsightQuery::new().limit(usize::MAX))
                    .await
                    .iter()
                    .map(|i| domain_dir(&i.domain).to_string())
                    .collect();
                domains.into_iter().collect()
            }
            Some(dir) => self
                .domain_insights(dir, InsightQuery::new().limit(usize::MAX))
                .await
                .into_iter()
                .map(|i| i.id)
                .collect(),
        }
    }

    /// Read content at `path`; unresolved paths read as empty
    pub async fn read(&self, path: &str) -> String {
        let start = Instant::now();
        let normalized = normalize(path);
        let parts = segments(normalized);

        let content = match parts.split_last() {
            None => self.directory_root().await,
            Some((&DIRECTORY_FILE, parent)) => self.directory_for(parent).await,
            Some(_) => match section_of(&parts) {
                Some(Section::Identity) if parts.get(1) == Some(&SOUL_FILE) => self.soul.clone(),
                Some(Section::Knowledge) => self.read_knowledge(&parts[1..]).await,
                Some(Section::Experience) => self.read_experience(&parts[1..]).await,
                _ => String::new(),
            },
        };

        self.record(
            RetrievalTrace::new(TraceAction::Read, format!("/{}", normalized))
                .with_tokens(content.chars().count() / CHARS_PER_TOKEN)
                .with_duration(start.elapsed()),
        );
        content
    }

    /// `/knowledge/{domain}/{id}`, also through tag segments
    async fn read_knowledge(&self, parts: &[&str]) -> String {
        if parts.len() < 2 {
            return String::new();
        }
        let (dir, id) = (parts[0], parts[parts.len() - 1]);
        self.domain_insights(dir, InsightQuery::new().limit(usize::MAX))
            .await
            .into_iter()
            .find(|i| i.id == id)
            .map(|i| {
                format!(
                    "{}\n\nConfidence: {}\nEvidence: {}",
                    i.content, i.confidence, i.evidence_count
                )
            })
            .unwrap_or_default()
    }

    /// `/experience/{id}`
    async fn read_experience(&self, parts: &[&str]) -> String {
        let Some(id) = parts.last() else {
            return String::new();
        };
        self.episodes(EpisodeQuery::new().limit(usize::MAX))
            .await
            .into_iter()
            .find(|e| e.id == *id)
            .map(|e| {
                format!(
                    "Action: {}\nInput: {}\nOutput: {}\nDuration: {}ms",
                    e.action, e.input_summary, e.output_summary, e.duration_ms
                )
            })
            .unwrap_or_default()
    }

    /// Search insights, then episodes, for `query`
    ///
    /// A `/knowledge/{domain}/` scope narrows insights to that domain.
    /// Episodes are searched only under the root or `/experience/` scope.
    pub async fn search(&self, query: &str, scope: &str) -> Vec<SearchHit> {
        let start = Instant::now();
        let normalized = normalize(scope);
        let parts = segments(normalized);
        let section = section_of(&parts);

        let insight_query = InsightQuery::new()
            .text(query)
            .limit(self.config.search_insight_limit);
        let insights = match (section, parts.get(1)) {
            (Some(Section::Knowledge), Some(dir)) => self.domain_insights(dir, insight_query).await,
            _ => self.insights(insight_query).await,
        };

        let mut hits: Vec<SearchHit> = insights
            .into_iter()
            .map(|i| SearchHit {
                path: format!("/knowledge/{}/{}", domain_dir(&i.domain), i.id),
                content: i.content,
                confidence: Some(i.confidence),
            })
            .collect();

        if parts.is_empty() || section == Some(Section::Experience) {
            let needle = query.to_lowercase();
            hits.extend(
                self.episodes(EpisodeQuery::new().limit(usize::MAX))
                    .await
                    .into_iter()
                    .filter(|e| e.output_summary.to_lowercase().contains(&needle))
                    .take(self.config.search_episode_limit)
                    .map(|e| SearchHit {
                        path: format!("/experience/{}", e.id),
                        content: e.output_summary,
                        confidence: None,
                    }),
            );
        }

        let trace_path = if normalized.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", normalized)
        };
        self.record(
            RetrievalTrace::new(TraceAction::Search, trace_path)
                .with_query(query)
                .with_results(hits.len())
                .with_duration(start.elapsed()),
        );
        hits
    }

    /// Write `content` at `path`
    ///
    /// `/knowledge/{domain}[/{tag}..]/{id}` stores an insight; a bare
    /// `/knowledge/{domain}` gets a generated id. `/experience/../{action}`
    /// records an episode. Anything else is ignored.
    pub async fn write(&self, path: &str, content: &str, metadata: WriteMetadata) {
        let start = Instant::now();
        let normalized = normalize(path);
        let parts = segments(normalized);

        if parts.len() >= 2 {
            let result = match section_of(&parts) {
                Some(Section::Knowledge) => {
                    let id = if parts.len() >= 3 {
                        parts[parts.len() - 1].to_string()
                    } else {
                        short_id()
                    };
                    let tags = if parts.len() > 3 {
                        &parts[2..parts.len() - 1]
                    } else {
                        &[][..]
                    };
                    let insight = Insight::new(id, content)
                        .with_confidence(
                            metadata
                                .confidence
                                .unwrap_or(self.config.default_write_confidence),
                        )
                        .with_domain(dir_domain(parts[1]))
                        .with_tags(tags.iter().copied());
                    self.memory.store_insight(insight).await
                }
                Some(Section::Experience) => {
                    let action = parts[parts.len() - 1];
                    let summary: String = content.chars().take(self.config.summary_limit).collect();
                    let episode = Episode::new(action, action)
                        .with_operator(
                            metadata.operator_id.unwrap_or_default(),
                            metadata.node_name.unwrap_or_default(),
                        )
                        .with_summaries("", summary)
                        .with_outcome("content", content)
                        .with_domain(metadata.domain.unwrap_or_default());
                    self.memory.record_episode(episode).await
                }
                _ => Ok(()),
            };
            if let Err(e) = result {
                tracing::warn!(path = %path, error = %e, "memory write failed");
            }
        }

        self.record(
            RetrievalTrace::new(TraceAction::Write, format!("/{}", normalized))
                .with_duration(start.elapsed()),
        );
    }

    /// Agent insights, logging and swallowing store failures
    pub(super) async fn insights(&self, query: InsightQuery) -> Vec<Insight> {
        self.memory.recall_insights(&query).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to recall insights");
            Vec::new()
        })
    }

    /// Insights under the knowledge directory `dir`
    ///
    /// `_` holds insights with no domain. An empty domain filter matches
    /// everything, so that directory is filtered here instead of in the store.
    pub(super) async fn domain_insights(&self, dir: &str, query: InsightQuery) -> Vec<Insight> {
        let domain = dir_domain(dir);
        if !domain.is_empty() {
            return self.insights(query.domain(domain)).await;
        }
        let limit = query.limit;
        self.insights(query.limit(usize::MAX))
            .await
            .into_iter()
            .filter(|i| i.domain.is_empty())
            .take(limit)
            .collect()
    }

    /// Agent episodes, oldest first, logging and swallowing store failures
    pub(super) async fn episodes(&self, query: EpisodeQuery) -> Vec<Episode> {
        self.memory.recall_episodes(&query).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to recall episodes");
            Vec::new()
        })
    }

    /// Newest `limit` episodes, oldest first
    pub(super) async fn recent_episodes(&self, limit: usize) -> Vec<Episode> {
        self.memory
            .recall_recent_episodes(&EpisodeQuery::new().limit(limit))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to recall episodes");
                Vec::new()
            })
    }
}
