//! Shared org-level fact store with access control

use crate::config::WorkspaceConfig;
use crate::error::StrataResult;
use crate::memory::access::ClearanceProfile;
use crate::memory::storage::{FactStore, InMemoryFactStore};
use crate::memory::types::{Fact, FactQuery};
use chrono::Utc;
use std::sync::Arc;

/// Candidates fetched per requested result, to leave room for clearance filtering
pub const DEFAULT_OVERFETCH: usize = 3;

/// Shared org-level fact store
///
/// Wraps a [`FactStore`] and filters every query through a caller-supplied
/// [`ClearanceProfile`]. Facts returned by a query have their access counters
/// bumped through [`FactStore::record_access`].
pub struct WorkspaceMemory {
    store: Arc<dyn FactStore>,
    overfetch: usize,
}

impl WorkspaceMemory {
    /// Create a workspace backed by an in-memory fact store
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryFactStore::new()))
    }

    /// Create a workspace backed by any fact store
    pub fn with_store(store: Arc<dyn FactStore>) -> Self {
        Self {
            store,
            overfetch: DEFAULT_OVERFETCH,
        }
    }

    /// Create an in-memory workspace tuned by `config`
    pub fn from_config(config: &WorkspaceConfig) -> Self {
        Self::new().with_overfetch(config.overfetch)
    }

    /// Set the over-fetch factor used by [`query`](Self::query)
    pub fn with_overfetch(mut self, factor: usize) -> Self {
        self.overfetch = factor.max(1);
        self
    }

    /// Store a fact
    pub async fn store_fact(&self, fact: Fact) -> StrataResult<()> {
        tracing::debug!(fact_id = %fact.id, domain = %fact.domain, "storing workspace fact");
        self.store.store(fact).await?;
        Ok(())
    }

    /// Get a fact by id without clearance checks or access tracking
    pub async fn get_fact(&self, id: &str) -> StrataResult<Option<Fact>> {
        Ok(self.store.get(id).await?)
    }

    /// Replace a fact, stamping `updated_at`
    pub async fn update_fact(&self, mut fact: Fact) -> StrataResult<()> {
        fact.updated_at = Utc::now();
        self.store.update(fact).await?;
        Ok(())
    }

    /// Query facts visible to `clearance`
    ///
    /// Fetches `limit * overfetch` candidates, drops the ones the holder may
    /// not see, keeps the first `limit`, and records the access on each.
    pub async fn query(
        &self,
        clearance: &ClearanceProfile,
        query: &FactQuery,
    ) -> StrataResult<Vec<Fact>> {
        let limit = query.limit;
        let widened = FactQuery {
            limit: limit.saturating_mul(self.overfetch),
            ..query.clone()
        };
        let candidates = self.store.query(&widened).await?;
        let fetched = candidates.len();

        let visible_ids: Vec<String> = candidates
            .into_iter()
            .filter(|f| clearance.can_access(f))
            .take(limit)
            .map(|f| f.id)
            .collect();

        let visible = self.store.record_access(&visible_ids).await?;

        tracing::debug!(
            holder = %clearance.holder_id,
            fetched,
            visible = visible.len(),
            "workspace query"
        );
        Ok(visible)
    }
}

impl Default for WorkspaceMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::types::Classification;

    async fn seeded() -> WorkspaceMemory {
        let ws = WorkspaceMemory::new();
        ws.store_fact(
            Fact::new("f1", "Enterprise deals need a VP sponsor")
                .with_domain("revenue")
                .with_classification(Classification::Confidential),
        )
        .await
        .unwrap();
        ws.store_fact(Fact::new("f2", "Q3 pipeline is 2x Q2").with_domain("revenue"))
            .await
            .unwrap();
        ws.store_fact(
            Fact::new("f3", "Company founded in 2019").with_classification(Classification::Public),
        )
        .await
        .unwrap();
        ws
    }

    #[tokio::test]
    async fn test_query_filters_by_clearance() {
        let ws = seeded().await;

        let sdr = ClearanceProfile::new("sdr").grant("revenue", Classification::Internal);
        let ids: Vec<String> = ws
            .query(&sdr, &FactQuery::new())
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, vec!["f2", "f3"]);

        let cro = ClearanceProfile::new("cro").grant("revenue", Classification::Restricted);
        assert_eq!(ws.query(&cro, &FactQuery::new()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_query_tracks_access() {
        let ws = seeded().await;
        let profile = ClearanceProfile::new("anyone");

        ws.query(&profile, &FactQuery::new()).await.unwrap();
        ws.query(&profile, &FactQuery::new()).await.unwrap();

        let public = ws.get_fact("f3").await.unwrap().unwrap();
        assert_eq!(public.access_count, 2);
        assert!(public.last_accessed.is_some());

        // Hidden facts are not touched
        let hidden = ws.get_fact("f1").await.unwrap().unwrap();
        assert_eq!(hidden.access_count, 0);
    }

    #[tokio::test]
    async fn test_query_overfetches_past_hidden_facts() {
        let ws = WorkspaceMemory::new();
        for i in 0..2 {
            ws.store_fact(
                Fact::new(format!("secret{i}"), "hidden")
                    .with_domain("legal")
                    .with_classification(Classification::Restricted),
            )
            .await
            .unwrap();
        }
        ws.store_fact(Fact::new("open", "visible").with_classification(Classification::Public))
            .await
            .unwrap();

        let profile = ClearanceProfile::new("sdr");
        let facts = ws.query(&profile, &FactQuery::new().limit(1)).await.unwrap();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].id, "open");
    }

    #[tokio::test]
    async fn test_overfetch_of_one_can_starve_query() {
        let ws = WorkspaceMemory::from_config(&WorkspaceConfig { overfetch: 1 });
        ws.store_fact(
            Fact::new("secret", "hidden")
                .with_domain("legal")
                .with_classification(Classification::Restricted),
        )
        .await
        .unwrap();
        ws.store_fact(Fact::new("open", "visible").with_classification(Classification::Public))
            .await
            .unwrap();

        let facts = ws
            .query(&ClearanceProfile::new("sdr"), &FactQuery::new().limit(1))
            .await
            .unwrap();
        assert!(facts.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_queries_count_every_access() {
        let ws = Arc::new(WorkspaceMemory::new());
        ws.store_fact(Fact::new("open", "visible").with_classification(Classification::Public))
            .await
            .unwrap();

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let ws = ws.clone();
                tokio::spawn(async move {
                    let profile = ClearanceProfile::new(format!("agent-{i}"));
                    for _ in 0..200 {
                        ws.query(&profile, &FactQuery::new()).await.unwrap();
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let fact = ws.get_fact("open").await.unwrap().unwrap();
        assert_eq!(fact.access_count, 3200);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_queries_do_not_revert_concurrent_updates() {
        let ws = Arc::new(WorkspaceMemory::new());
        ws.store_fact(Fact::new("open", "v0").with_classification(Classification::Public))
            .await
            .unwrap();

        let reader = {
            let ws = ws.clone();
            tokio::spawn(async move {
                let profile = ClearanceProfile::new("reader");
                for _ in 0..200 {
                    ws.query(&profile, &FactQuery::new()).await.unwrap();
                }
            })
        };
        for version in 1..=50 {
            let mut fact = ws.get_fact("open").await.unwrap().unwrap();
            fact.content = format!("v{version}");
            ws.update_fact(fact).await.unwrap();
            tokio::task::yield_now().await;
        }
        reader.await.unwrap();

        let fact = ws.get_fact("open").await.unwrap().unwrap();
        assert_eq!(fact.content, "v50");
    }

    #[tokio::test]
    async fn test_update_fact_stamps_updated_at() {
        let ws = seeded().await;
        let mut fact = ws.get_fact("f2").await.unwrap().unwrap();
        let before = fact.updated_at;
        fact.content = "Q3 pipeline is 3x Q2".into();
        ws.update_fact(fact).await.unwrap();

        let after = ws.get_fact("f2").await.unwrap().unwrap();
        assert_eq!(after.content, "Q3 pipeline is 3x Q2");
        assert!(after.updated_at >= before);
    }
}
