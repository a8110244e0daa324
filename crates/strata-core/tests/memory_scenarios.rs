//! End-to-end memory scenarios
//!
//! Drives the public API the way an orchestrator would: record work, reflect,
//! publish, then pull context back out through the assembler and filesystem.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use strata_core::{
    AccessFilter, AgentMemory, Classification, ClearanceProfile, Episode, Fact, MemoryAssembler,
    MemoryFilesystem, MemoryScope, StrataConfig, StrataResult, WorkspaceMemory,
    llm::{GenerationOptions, GenerationResponse, LlmMessage, TextGenerator},
    memory::{InsightQuery, WriteMetadata, types::TraceAction},
};

/// Returns canned responses in order and remembers every prompt
struct ScriptedGenerator {
    responses: Mutex<Vec<String>>,
    prompts: Mutex<Vec<(String, Vec<LlmMessage>)>>,
}

impl ScriptedGenerator {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().rev().map(|r| r.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        system: &str,
        messages: &[LlmMessage],
        _options: &GenerationOptions,
    ) -> StrataResult<GenerationResponse> {
        self.prompts
            .lock()
            .push((system.to_string(), messages.to_vec()));
        let content = self.responses.lock().pop().unwrap_or_else(|| "[]".to_string());
        Ok(GenerationResponse {
            content,
            tokens_in: 420,
            tokens_out: 64,
        })
    }
}

async fn record_lead_episodes(memory: &AgentMemory) -> StrataResult<()> {
    for i in 0..4 {
        memory
            .record_episode(
                Episode::new(format!("webinar-{i}"), "score_lead")
                    .with_domain("revenue")
                    .with_tags(["webinar"])
                    .with_summaries("webinar signup", format!("webinar lead scored {}", 82 + i))
                    .with_outcome("score", 82 + i),
            )
            .await?;
        memory
            .record_episode(
                Episode::new(format!("cold-{i}"), "score_lead")
                    .with_domain("revenue")
                    .with_tags(["cold-outbound"])
                    .with_summaries(
                        "cold outbound reply",
                        format!("cold outbound lead scored {}", 25 + i),
                    )
                    .with_outcome("score", 25 + i),
            )
            .await?;
    }
    Ok(())
}

#[tokio::test]
async fn test_reflection_scenario() -> StrataResult<()> {
    let memory = AgentMemory::new("sdr-1");
    record_lead_episodes(&memory).await?;

    let generator = ScriptedGenerator::new(&[
        r#"```json
[{"content": "Webinar leads score 80+ while cold outbound stays under 40", "confidence": 0.7, "domain": "revenue", "tags": ["lead-source"]}]
```"#,
    ]);

    let created = memory.reflect(&generator, "You are the SDR for Acme.").await?;
    assert_eq!(created.len(), 1);
    assert_eq!(generator.calls(), 1);

    let recalled = memory.recall_insights(&InsightQuery::new().domain("revenue")).await?;
    assert_eq!(recalled.len(), 1);
    assert_eq!(recalled[0].id, created[0].id);

    let (system, messages) = generator.prompts.lock()[0].clone();
    assert!(system.starts_with("You are the SDR for Acme.\n"));
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content.lines().filter(|l| l.starts_with("- [revenue]")).count(), 8);
    Ok(())
}

#[tokio::test]
async fn test_empty_reflection_never_calls_generator() -> StrataResult<()> {
    let memory = AgentMemory::new("idle");
    let generator = ScriptedGenerator::new(&[]);

    assert!(memory.reflect(&generator, "").await?.is_empty());
    assert_eq!(generator.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_reinforcement_is_bounded() -> StrataResult<()> {
    let memory = AgentMemory::new("sdr-1");
    record_lead_episodes(&memory).await?;
    let response = r#"[{"content": "Webinar leads beat cold outbound leads", "confidence": 0.5}]"#;
    let generator = ScriptedGenerator::new(&[response; 10]);

    assert_eq!(memory.reflect(&generator, "").await?.len(), 1);
    for _ in 0..9 {
        assert!(memory.reflect(&generator, "").await?.is_empty());
    }

    let insights = memory.recall_insights(&InsightQuery::new()).await?;
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].evidence_count, 10);
    assert!((insights[0].confidence.value() - 1.0).abs() < f32::EPSILON);
    Ok(())
}

#[tokio::test]
async fn test_confidential_fact_scenario() -> StrataResult<()> {
    let fact = Fact::new("arr", "Enterprise ARR is 12M")
        .with_domain("revenue")
        .with_classification(Classification::Confidential);

    let internal = ClearanceProfile::new("sdr").grant("revenue", Classification::Internal);
    assert!(AccessFilter::new(internal).filter(vec![fact.clone()]).is_empty());

    for level in [Classification::Confidential, Classification::Restricted] {
        let profile = ClearanceProfile::new("cro").grant("revenue", level);
        assert_eq!(AccessFilter::new(profile).filter(vec![fact.clone()]).len(), 1);
    }
    Ok(())
}

#[tokio::test]
async fn test_publish_then_assemble() -> StrataResult<()> {
    let workspace = Arc::new(WorkspaceMemory::new());
    workspace
        .store_fact(
            Fact::new("board", "Board wants 30% growth")
                .with_domain("revenue")
                .with_classification(Classification::Restricted),
        )
        .await?;

    let sdr = AgentMemory::new("sdr-1").with_workspace(&workspace);
    record_lead_episodes(&sdr).await?;
    let generator = ScriptedGenerator::new(&[
        r#"[{"content": "Webinar leads convert best", "confidence": 0.8, "domain": "revenue"}]"#,
    ]);
    sdr.reflect(&generator, "").await?;
    let published = sdr.publish_to_workspace(0.5).await?;
    assert_eq!(published.len(), 1);

    let ae = Arc::new(AgentMemory::new("ae-1").with_workspace(&workspace));
    let clearance = ClearanceProfile::new("ae-1").grant("revenue", Classification::Internal);
    let assembler = MemoryAssembler::new(ae, clearance);

    let context = assembler
        .assemble(&MemoryScope::new().domain("revenue"), 2000)
        .await;
    assert_eq!(context, "## Context\n- Webinar leads convert best");

    let sdr = Arc::new(sdr);
    let assembler = MemoryAssembler::new(sdr, ClearanceProfile::new("sdr-1"));
    let context = assembler.assemble(&MemoryScope::new().domain("revenue"), 2000).await;
    let insights_at = context.find("## Insights").expect("insights section");
    let activity_at = context.find("## Recent Activity").expect("activity section");
    assert!(insights_at < activity_at);
    assert!(!context.contains("## Context"));

    let tight = assembler.assemble(&MemoryScope::new(), 10).await;
    assert!(tight.chars().count() <= 40);
    Ok(())
}

#[tokio::test]
async fn test_filesystem_round_trip() -> StrataResult<()> {
    let config = StrataConfig::default();
    let memory = Arc::new(AgentMemory::from_config("sdr-1", &config));
    let fs = MemoryFilesystem::new(memory)
        .with_config(config.filesystem.clone())
        .with_soul("Revenue SDR");

    fs.write(
        "/knowledge/revenue/new-insight",
        "VP sponsor predicts conversion",
        WriteMetadata::new(),
    )
    .await;

    let ids = fs.browse("/knowledge/revenue/").await;
    assert_eq!(ids, vec!["new-insight"]);
    let content = fs.read(&format!("/knowledge/revenue/{}", ids[0])).await;
    assert!(content.starts_with("VP sponsor predicts conversion"));

    let actions: Vec<TraceAction> = fs.traces().iter().map(|t| t.action).collect();
    assert_eq!(actions, vec![TraceAction::Write, TraceAction::Browse, TraceAction::Read]);
    Ok(())
}
