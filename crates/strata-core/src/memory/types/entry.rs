//! Flat key-value entries for the legacy memory contract

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single entry returned by the flat `recall(namespace, query, limit)` contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub key: String,
    pub content: String,
    pub namespace: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl MemoryEntry {
    /// Create a new entry
    pub fn new(
        key: impl Into<String>,
        content: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            content: content.into(),
            namespace: namespace.into(),
            created_at: Utc::now(),
            metadata: HashMap::new(),
        }
    }
}
