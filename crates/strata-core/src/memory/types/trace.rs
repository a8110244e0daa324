//! Retrieval traces for memory observability

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of memory access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceAction {
    Browse,
    Read,
    Search,
    Write,
}

impl std::fmt::Display for TraceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceAction::Browse => write!(f, "browse"),
            TraceAction::Read => write!(f, "read"),
            TraceAction::Search => write!(f, "search"),
            TraceAction::Write => write!(f, "write"),
        }
    }
}

/// Observable record of one memory access, used for debugging and cost accounting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalTrace {
    pub action: TraceAction,
    pub path: String,
    pub query: String,
    pub results_count: usize,
    /// Rough token estimate of the content loaded
    pub tokens_loaded: usize,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
}

impl RetrievalTrace {
    /// Create a trace for an action on a path
    pub fn new(action: TraceAction, path: impl Into<String>) -> Self {
        Self {
            action,
            path: path.into(),
            query: String::new(),
            results_count: 0,
            tokens_loaded: 0,
            timestamp: Utc::now(),
            duration_ms: 0,
        }
    }

    /// Set the query text
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Set the number of results
    pub fn with_results(mut self, count: usize) -> Self {
        self.results_count = count;
        self
    }

    /// Set the token estimate
    pub fn with_tokens(mut self, tokens: usize) -> Self {
        self.tokens_loaded = tokens;
        self
    }

    /// Set the elapsed wall-clock time
    pub fn with_duration(mut self, elapsed: std::time::Duration) -> Self {
        self.duration_ms = elapsed.as_millis() as u64;
        self
    }
}
