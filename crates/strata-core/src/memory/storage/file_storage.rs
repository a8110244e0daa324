//! File-backed fact storage

use super::in_memory::touch_all;
use super::query::fact_matches;
use super::r#trait::FactStore;
use crate::error::StorageError;
use crate::memory::types::{Fact, FactQuery};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

const FORMAT_VERSION: u32 = 1;

/// On-disk document format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FactFile {
    version: u32,
    facts: Vec<Fact>,
}

/// Fact store persisted as a single JSON document
///
/// The whole document is rewritten after every mutation, so this backend
/// suits workspaces of modest size. Filter semantics match
/// [`InMemoryFactStore`](super::InMemoryFactStore).
#[derive(Debug)]
pub struct JsonFileFactStore {
    path: PathBuf,
    facts: Arc<RwLock<Vec<Fact>>>,
}

impl JsonFileFactStore {
    /// Open a store at `path`, loading existing facts if the file exists
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let facts = if path.exists() {
            Self::load_from_file(&path).await?
        } else {
            Vec::new()
        };

        tracing::debug!(path = %path.display(), facts = facts.len(), "opened fact file");

        Ok(Self {
            path,
            facts: Arc::new(RwLock::new(facts)),
        })
    }

    async fn load_from_file(path: &Path) -> Result<Vec<Fact>, StorageError> {
        let content = tokio::fs::read_to_string(path).await?;
        let file: FactFile = serde_json::from_str(&content)?;
        if file.version != FORMAT_VERSION {
            return Err(StorageError::Corrupted(format!(
                "unsupported fact file version {} in {}",
                file.version,
                path.display()
            )));
        }
        Ok(file.facts)
    }

    async fn save(&self, facts: &[Fact]) -> Result<(), StorageError> {
        let file = FactFile {
            version: FORMAT_VERSION,
            facts: facts.to_vec(),
        };

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(&file)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }

    /// Apply `change` to a copy of the facts, persist it, then swap it in
    ///
    /// A failed write leaves both memory and disk untouched.
    async fn mutate<R>(
        &self,
        change: impl FnOnce(&mut Vec<Fact>) -> R,
    ) -> Result<R, StorageError> {
        let mut facts = self.facts.write().await;
        let mut next = facts.clone();
        let result = change(&mut next);
        self.save(&next).await?;
        *facts = next;
        Ok(result)
    }

    async fn upsert(&self, fact: Fact) -> Result<(), StorageError> {
        self.mutate(|facts| match facts.iter_mut().find(|f| f.id == fact.id) {
            Some(existing) => *existing = fact,
            None => facts.push(fact),
        })
        .await
    }

    /// Force save to disk
    pub async fn flush(&self) -> Result<(), StorageError> {
        let facts = self.facts.read().await;
        self.save(&facts).await
    }

    /// Get storage path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FactStore for JsonFileFactStore {
    async fn store(&self, fact: Fact) -> Result<(), StorageError> {
        self.upsert(fact).await
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
        self.upsert(fact).await
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        if !self.facts.read().await.iter().any(|f| f.id == id) {
            return Ok(());
        }
        self.mutate(|facts| facts.retain(|f| f.id != id)).await
    }

    async fn record_access(&self, ids: &[String]) -> Result<Vec<Fact>, StorageError> {
        self.mutate(|facts| touch_all(facts, ids)).await
    }
}
