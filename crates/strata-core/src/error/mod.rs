//! Error types for Strata
//!
//! Lookups that find nothing are not errors here: they return `None`, an empty
//! list, or an empty string. Errors are reserved for configuration problems,
//! storage backend failures, and transport failures from the text-generation
//! collaborator.

mod constructors;
mod conversions;
mod types;

pub use types::{StorageError, StrataError, StrataResult};
