//! Virtual filesystem over agent memory
//!
//! Paths map onto the memory layers:
//!
//! ```text
//! /identity/soul.md          soul text (read-only)
//! /knowledge/{domain}/{id}   insights
//! /experience/{id}           episodes
//! /references/               placeholder, always empty
//! ```
//!
//! Reading `.directory` under any path returns a generated summary instead
//! of raw content. Every operation records one
//! [`RetrievalTrace`](crate::memory::types::RetrievalTrace).

mod core;
mod directory;
mod paths;


pub use self::core::{MemoryFilesystem, SearchHit, WriteMetadata};
pub use paths::Section;
