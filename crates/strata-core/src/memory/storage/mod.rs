//! Fact, episode, and insight storage backends

mod file_storage;
mod in_memory;
mod query;
mod r#trait;

pub use file_storage::JsonFileFactStore;
pub use in_memory::{InMemoryEpisodicStore, InMemoryFactStore, InMemoryInsightStore};
pub use query::{episode_matches, fact_matches, insight_matches};
pub use r#trait::{EpisodicStore, FactStore, InsightStore};
