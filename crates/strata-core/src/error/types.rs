//! Core error types

use thiserror::Error;

/// Result type alias for Strata operations
pub type StrataResult<T> = Result<T, StrataError>;

/// Main error type for Strata
#[derive(Error, Debug, Clone)]
pub enum StrataError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Text-generation transport or API errors
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        provider: Option<String>,
    },

    /// Storage backend errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },
}

/// Errors raised by fact, episode, and insight store backends
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage corrupted: {0}")]
    Corrupted(String),
}

impl StrataError {
    /// Check if this error came from the text-generation collaborator
    pub fn is_llm(&self) -> bool {
        matches!(self, Self::Llm { .. })
    }

    /// Get the error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "STRATA_CONFIG",
            Self::Llm { .. } => "STRATA_LLM",
            Self::Storage(_) => "STRATA_STORAGE",
            Self::Io { .. } => "STRATA_IO",
            Self::Json { .. } => "STRATA_JSON",
            Self::InvalidInput { .. } => "STRATA_INVALID_INPUT",
        }
    }
}
