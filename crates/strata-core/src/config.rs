//! Configuration for the memory core
//!
//! Every tunable has a default, so an empty file (or no file) is valid.
//! Files are parsed by extension: `.toml`, `.yaml`/`.yml`, otherwise JSON.

use crate::error::{StrataError, StrataResult};
use crate::llm::GenerationOptions;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Reflection tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectionConfig {
    /// Number of most recent episodes shown to the model
    pub episode_window: usize,
    /// Confidence added when an existing insight is confirmed
    pub reinforcement_step: f32,
    /// Confidence for candidates that omit one
    pub default_candidate_confidence: f32,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            episode_window: 50,
            reinforcement_step: 0.1,
            default_candidate_confidence: 0.5,
            model: "sonnet".to_string(),
            temperature: 0.3,
            max_tokens: 4096,
        }
    }
}

impl ReflectionConfig {
    /// Generation options for the reflection call
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Publishing tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub min_confidence: f32,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
        }
    }
}

/// Context assembly tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    pub token_budget: usize,
    /// Characters counted per token when truncating
    pub chars_per_token: usize,
    pub max_insights: usize,
    pub max_facts: usize,
    pub max_episodes: usize,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            token_budget: 2000,
            chars_per_token: 4,
            max_insights: 5,
            max_facts: 10,
            max_episodes: 3,
        }
    }
}

/// Virtual filesystem tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesystemConfig {
    /// Maximum characters kept as an episode's output summary on write
    pub summary_limit: usize,
    pub search_insight_limit: usize,
    pub search_episode_limit: usize,
    pub default_write_confidence: f32,
}

impl Default for FilesystemConfig {
    fn default() -> Self {
        Self {
            summary_limit: 200,
            search_insight_limit: 10,
            search_episode_limit: 5,
            default_write_confidence: 0.5,
        }
    }
}

/// Workspace tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Candidates fetched per requested fact, to leave room for clearance filtering
    pub overfetch: usize,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self { overfetch: 3 }
    }
}

/// Episodic store tunables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodicConfig {
    /// Per-agent cap; oldest episodes are evicted past it. Unbounded when `None`.
    pub max_episodes_per_agent: Option<usize>,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrataConfig {
    pub reflection: ReflectionConfig,
    pub publish: PublishConfig,
    pub assembler: AssemblerConfig,
    pub filesystem: FilesystemConfig,
    pub episodic: EpisodicConfig,
    pub workspace: WorkspaceConfig,
    pub logging: LoggingConfig,
}

impl StrataConfig {
    /// Load configuration from a file
    ///
    /// Returns the default config if the file doesn't exist.
    pub fn load_from_file(path: &Path) -> StrataResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            StrataError::config_with_context(
                format!("Failed to read config file: {}", e),
                format!("Reading configuration from '{}'", path.display()),
            )
        })?;

        let config: Self = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|e| {
                StrataError::config_with_context(
                    format!("Failed to parse TOML config: {}", e),
                    format!("Deserializing TOML configuration from '{}'", path.display()),
                )
            })?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
                StrataError::config_with_context(
                    format!("Failed to parse YAML config: {}", e),
                    format!("Deserializing YAML configuration from '{}'", path.display()),
                )
            })?,
            _ => serde_json::from_str(&content).map_err(|e| {
                StrataError::config_with_context(
                    format!("Failed to parse JSON config: {}", e),
                    format!("Deserializing JSON configuration from '{}'", path.display()),
                )
            })?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply `STRATA_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> StrataResult<()> {
        self.apply_env_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply `STRATA_*` overrides from an arbitrary lookup
    ///
    /// The overridden configuration is validated before it replaces `self`;
    /// on error `self` is left as it was.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F) -> StrataResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut next = self.clone();
        next.apply_overrides(lookup)?;
        next.validate()?;
        *self = next;
        Ok(())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> StrataResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(budget) = lookup("STRATA_TOKEN_BUDGET") {
            self.assembler.token_budget = budget
                .parse()
                .map_err(|_| StrataError::config("Invalid STRATA_TOKEN_BUDGET value"))?;
        }

        if let Some(model) = lookup("STRATA_REFLECTION_MODEL") {
            self.reflection.model = model;
        }

        if let Some(level) = lookup("STRATA_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(max) = lookup("STRATA_MAX_EPISODES_PER_AGENT") {
            let max: usize = max
                .parse()
                .map_err(|_| StrataError::config("Invalid STRATA_MAX_EPISODES_PER_AGENT value"))?;
            self.episodic.max_episodes_per_agent = Some(max);
        }

        Ok(())
    }

    /// Reject values the memory layers cannot work with
    pub fn validate(&self) -> StrataResult<()> {
        if self.assembler.token_budget == 0 {
            return Err(StrataError::invalid_field(
                "assembler.token_budget",
                "token budget must be greater than zero",
            ));
        }
        if self.assembler.chars_per_token == 0 {
            return Err(StrataError::invalid_field(
                "assembler.chars_per_token",
                "chars per token must be greater than zero",
            ));
        }
        if self.reflection.episode_window == 0 {
            return Err(StrataError::invalid_field(
                "reflection.episode_window",
                "episode window must be greater than zero",
            ));
        }
        if self.workspace.overfetch == 0 {
            return Err(StrataError::invalid_field(
                "workspace.overfetch",
                "overfetch factor must be greater than zero",
            ));
        }
        if self.episodic.max_episodes_per_agent == Some(0) {
            return Err(StrataError::invalid_field(
                "episodic.max_episodes_per_agent",
                "episode cap must be greater than zero",
            ));
        }

        let confidences = [
            ("reflection.reinforcement_step", self.reflection.reinforcement_step),
            (
                "reflection.default_candidate_confidence",
                self.reflection.default_candidate_confidence,
            ),
            ("publish.min_confidence", self.publish.min_confidence),
            (
                "filesystem.default_write_confidence",
                self.filesystem.default_write_confidence,
            ),
        ];
        for (field, value) in confidences {
            if !(0.0..=1.0).contains(&value) {
                return Err(StrataError::invalid_field(
                    field,
                    format!("{} must be within 0.0..=1.0, got {}", field, value),
                ));
            }
        }

        Ok(())
    }
}
