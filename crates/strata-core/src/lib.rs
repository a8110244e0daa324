//! Strata Core Library
//!
//! Layered, access-controlled memory for autonomous agents: episodes an agent
//! recorded, insights it derived through reflection, and facts shared across
//! a workspace. Context comes back out as bounded prompt text or through a
//! path-addressed virtual filesystem.

pub mod config;
pub mod error;
pub mod llm;
pub mod logging;
pub mod memory;

// Re-export commonly used types
pub use config::StrataConfig;
pub use error::{StorageError, StrataError, StrataResult};
pub use llm::{GenerationOptions, GenerationResponse, LlmMessage, MessageRole, TextGenerator};
pub use logging::{LoggingConfig, init_logging};
pub use memory::{
    AccessFilter, AgentMemory, Classification, ClearanceProfile, Episode, Fact, Insight,
    MemoryAssembler, MemoryFilesystem, MemoryScope, RetrievalTrace, WorkspaceMemory,
};
