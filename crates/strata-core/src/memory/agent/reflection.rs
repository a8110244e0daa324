//! Reflection: compressing episodes into insights

use super::core::AgentMemory;
use crate::error::StrataResult;
use crate::llm::{LlmMessage, TextGenerator};
use crate::memory::similarity::strip_code_fences;
use crate::memory::types::{Episode, EpisodeQuery, Insight, short_id};
use serde::Deserialize;

/// Fixed instruction sent with every reflection
pub const REFLECTION_INSTRUCTION: &str = "You are reflecting on recent work experiences.\n\
Extract patterns and insights as a JSON array:\n\
[{\"content\": \"...\", \"confidence\": 0.0-1.0, \"domain\": \"...\", \"tags\": [...]}]";

/// One insight proposed by the model
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InsightCandidate {
    pub content: String,
    #[serde(default)]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Build the system prompt and user message for a reflection over `episodes`
pub fn build_reflection_prompt(role_context: &str, episodes: &[Episode]) -> (String, String) {
    let system = if role_context.trim().is_empty() {
        REFLECTION_INSTRUCTION.to_string()
    } else {
        format!("{}\n{}", role_context.trim_end(), REFLECTION_INSTRUCTION)
    };

    let lines: Vec<String> = episodes
        .iter()
        .map(|e| format!("- [{}] {}: {}", e.domain, e.action, e.output_summary))
        .collect();
    let user = format!(
        "Recent episodes:\n{}\n\nWhat patterns do you see?",
        lines.join("\n")
    );

    (system, user)
}

/// Parse generated text into insight candidates
///
/// Anything that is not a JSON array yields no candidates. Array items that
/// are not objects with a non-blank string `content` are skipped.
pub fn parse_insight_candidates(text: &str) -> Vec<InsightCandidate> {
    let items: Vec<serde_json::Value> = match serde_json::from_str(strip_code_fences(text)) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(other) => {
            tracing::warn!(kind = json_kind(&other), "reflection response is not a JSON array");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse reflection response");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<InsightCandidate>(item) {
            Ok(candidate) if !candidate.content.trim().is_empty() => Some(candidate),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed insight candidate");
                None
            }
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl AgentMemory {
    /// Compress recent episodes into insights
    ///
    /// Shows the newest episodes to `generator` and asks for recurring
    /// patterns. A candidate that restates an existing insight reinforces it;
    /// any other candidate is stored as a new insight. Only the newly created
    /// insights are returned.
    ///
    /// With no episodes, returns immediately without calling the generator.
    /// Unparseable output yields no insights. Errors from the generator
    /// itself propagate.
    pub async fn reflect(
        &self,
        generator: &dyn TextGenerator,
        role_context: &str,
    ) -> StrataResult<Vec<Insight>> {
        let window = EpisodeQuery::new().limit(self.reflection.episode_window);
        let recent = self.episodic.recent(&self.agent_id, &window).await?;
        if recent.is_empty() {
            tracing::debug!(agent_id = %self.agent_id, "no episodes to reflect on");
            return Ok(Vec::new());
        }

        let (system, user) = build_reflection_prompt(role_context, &recent);
        let response = generator
            .generate(
                &system,
                &[LlmMessage::user(user)],
                &self.reflection.generation_options(),
            )
            .await?;

        let candidates = parse_insight_candidates(&response.content);
        let source_ids: Vec<String> = recent.iter().map(|e| e.id.clone()).collect();

        let mut created = Vec::new();
        let mut reinforced = 0usize;
        for candidate in candidates {
            if let Some(mut existing) = self
                .insights
                .find_similar(&self.agent_id, &candidate.content)
                .await?
            {
                existing.reinforce(self.reflection.reinforcement_step);
                tracing::debug!(
                    insight_id = %existing.id,
                    confidence = %existing.confidence,
                    "reinforcing insight"
                );
                self.insights.update(existing).await?;
                reinforced += 1;
                continue;
            }

            let insight = Insight::new(format!("ins_{}", short_id()), candidate.content)
                .with_agent(self.agent_id.clone())
                .with_confidence(
                    candidate
                        .confidence
                        .unwrap_or(self.reflection.default_candidate_confidence),
                )
                .with_domain(candidate.domain.unwrap_or_default())
                .with_tags(candidate.tags.unwrap_or_default())
                .with_source_episodes(source_ids.iter().cloned());
            self.insights.store(insight.clone()).await?;
            created.push(insight);
        }

        tracing::info!(
            agent_id = %self.agent_id,
            episodes = recent.len(),
            created = created.len(),
            reinforced,
            tokens_in = response.tokens_in,
            tokens_out = response.tokens_out,
            "reflection complete"
        );
        Ok(created)
    }
}
