//! Memory types and data structures

mod base;
mod confidence;
mod entry;
mod episode;
mod fact;
mod insight;
mod query;
mod trace;

pub use base::{Classification, short_id};
pub use confidence::Confidence;
pub use entry::MemoryEntry;
pub use episode::Episode;
pub use fact::Fact;
pub use insight::{DEFAULT_INSIGHT_STATUS, Insight};
pub use query::{
    DEFAULT_EPISODE_LIMIT, DEFAULT_FACT_LIMIT, DEFAULT_INSIGHT_LIMIT, EpisodeQuery, FactQuery,
    InsightQuery,
};
pub use trace::{RetrievalTrace, TraceAction};
