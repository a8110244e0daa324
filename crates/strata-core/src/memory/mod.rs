//! Layered agent memory
//!
//! - Workspace facts: shared, classification-gated knowledge
//! - Episodes: what an agent did
//! - Insights: patterns an agent derived from its episodes
//!
//! [`MemoryAssembler`] and [`MemoryFilesystem`] are the two read paths
//! callers use before a generation call.

pub mod access;
pub mod agent;
pub mod assembler;
pub mod filesystem;
pub mod similarity;
pub mod storage;
pub mod types;
pub mod workspace;

pub use access::{AccessFilter, ClearanceProfile};
pub use agent::AgentMemory;
pub use assembler::{MemoryAssembler, MemoryScope};
pub use filesystem::{MemoryFilesystem, SearchHit, WriteMetadata};
pub use storage::{
    EpisodicStore, FactStore, InMemoryEpisodicStore, InMemoryFactStore, InMemoryInsightStore,
    InsightStore, JsonFileFactStore,
};
pub use types::{
    Classification, Confidence, Episode, EpisodeQuery, Fact, FactQuery, Insight, InsightQuery,
    MemoryEntry, RetrievalTrace, TraceAction,
};
pub use workspace::WorkspaceMemory;
