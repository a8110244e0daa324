//! Per-agent memory: episodes, insights, and a workspace reference
//!
//! [`AgentMemory`] owns one episodic store and one insight store for a single
//! agent identity. Reflection compresses episodes into insights, publishing
//! promotes confident insights into the shared workspace, and a flat
//! key-value shim serves callers written against the older contract.

mod compat;
mod core;
mod publish;
mod reflection;

#[cfg(test)]
mod tests;

pub use self::core::AgentMemory;
pub use reflection::{
    InsightCandidate, REFLECTION_INSTRUCTION, build_reflection_prompt, parse_insight_candidates,
};
