//! Tests for agent memory

use super::*;
use crate::error::StrataError;
use crate::llm::{GenerationResponse, MockTextGenerator};
use crate::memory::types::{Classification, Episode, EpisodeQuery, Insight, InsightQuery};
use crate::memory::workspace::WorkspaceMemory;
use chrono::{Duration, Utc};
use std::sync::Arc;

fn generator_returning(content: &'static str) -> MockTextGenerator {
    let mut mock = MockTextGenerator::new();
    mock.expect_generate()
        .returning(move |_, _, _| Ok(GenerationResponse::text(content)));
    mock
}

async fn record_campaign_episodes(memory: &AgentMemory) {
    let base = Utc::now() - Duration::hours(8);
    for i in 0..4 {
        memory
            .record_episode(
                Episode::new(format!("web{i}"), "qualify_lead")
                    .with_domain("revenue")
                    .with_summaries(
                        "webinar attendee",
                        format!("webinar lead scored {}", 80 + i),
                    )
                    .with_outcome("score", 80 + i)
                    .at(base + Duration::minutes(i * 2)),
            )
            .await
            .unwrap();
        memory
            .record_episode(
                Episode::new(format!("cold{i}"), "qualify_lead")
                    .with_domain("revenue")
                    .with_summaries(
                        "cold outbound reply",
                        format!("cold outbound lead scored {}", 30 + i),
                    )
                    .with_outcome("score", 30 + i)
                    .at(base + Duration::minutes(i * 2 + 1)),
            )
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_record_episode_stamps_agent() {
    let memory = AgentMemory::new("sdr-1");
    let mut episode = Episode::new("e1", "send_email");
    episode.agent_id = "someone-else".into();
    memory.record_episode(episode).await.unwrap();

    let episodes = memory.recall_episodes(&EpisodeQuery::new()).await.unwrap();
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].agent_id, "sdr-1");
}

#[tokio::test]
async fn test_store_insight_stamps_agent() {
    let memory = AgentMemory::new("sdr-1");
    memory
        .store_insight(Insight::new("i1", "Tuesdays get replies").with_agent("other"))
        .await
        .unwrap();

    let insights = memory.recall_insights(&InsightQuery::new()).await.unwrap();
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].agent_id, "sdr-1");
}

#[tokio::test]
async fn test_reflect_without_episodes_skips_generator() {
    let memory = AgentMemory::new("sdr-1");
    let mut mock = MockTextGenerator::new();
    mock.expect_generate().times(0);

    let created = memory.reflect(&mock, "You are an SDR.").await.unwrap();
    assert!(created.is_empty());
}

#[tokio::test]
async fn test_reflect_creates_insight_from_campaign() {
    let memory = AgentMemory::new("sdr-1");
    record_campaign_episodes(&memory).await;

    let mut mock = MockTextGenerator::new();
    mock.expect_generate()
        .withf(|system, messages, options| {
            system.starts_with("You are an SDR.\n")
                && system.contains("JSON array")
                && messages.len() == 1
                && messages[0].content.contains("- [revenue] qualify_lead: webinar lead scored 80")
                && options.model == "sonnet"
        })
        .times(1)
        .returning(|_, _, _| {
            Ok(GenerationResponse::text(
                "```json\n[{\"content\": \"Webinar leads score far higher than cold outbound\", \"confidence\": 0.8, \"domain\": \"revenue\", \"tags\": [\"lead-source\"]}]\n```",
            ))
        });

    let created = memory.reflect(&mock, "You are an SDR.").await.unwrap();
    assert_eq!(created.len(), 1);
    let insight = &created[0];
    assert!(insight.id.starts_with("ins_"));
    assert_eq!(insight.agent_id, "sdr-1");
    assert_eq!(insight.domain, "revenue");
    assert_eq!(insight.tags, vec!["lead-source"]);
    assert_eq!(insight.source_episode_ids.len(), 8);
    assert!((insight.confidence.value() - 0.8).abs() < 1e-6);

    let stored = memory.recall_insights(&InsightQuery::new()).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, insight.id);
}

#[tokio::test]
async fn test_reflect_reinforces_similar_insight() {
    let memory = AgentMemory::new("sdr-1");
    record_campaign_episodes(&memory).await;
    let mock = generator_returning(
        r#"[{"content": "Webinar leads convert better than cold outbound", "confidence": 0.6}]"#,
    );

    let first = memory.reflect(&mock, "").await.unwrap();
    assert_eq!(first.len(), 1);

    for round in 1..=6 {
        let again = memory.reflect(&mock, "").await.unwrap();
        assert!(again.is_empty());

        let insights = memory.recall_insights(&InsightQuery::new()).await.unwrap();
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].evidence_count, 1 + round);
        let expected = (0.6 + 0.1 * round as f32).min(1.0);
        assert!((insights[0].confidence.value() - expected).abs() < 1e-4);
        assert!(insights[0].confidence.value() <= 1.0);
        assert!(insights[0].last_confirmed.is_some());
    }
}

#[tokio::test]
async fn test_reflect_swallows_malformed_output() {
    let memory = AgentMemory::new("sdr-1");
    record_campaign_episodes(&memory).await;

    for content in ["not json at all", r#"{"content": "an object"}"#, "```\n```"] {
        let mock = generator_returning(content);
        assert!(memory.reflect(&mock, "").await.unwrap().is_empty());
    }
    assert!(memory.recall_insights(&InsightQuery::new()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reflect_propagates_generator_error() {
    let memory = AgentMemory::new("sdr-1");
    record_campaign_episodes(&memory).await;

    let mut mock = MockTextGenerator::new();
    mock.expect_generate()
        .returning(|_, _, _| Err(StrataError::llm_with_provider("rate limited", "anthropic")));

    let err = memory.reflect(&mock, "").await.unwrap_err();
    assert!(err.is_llm());
}

#[tokio::test]
async fn test_reflect_uses_most_recent_window() {
    let mut config = crate::config::StrataConfig::default();
    config.reflection.episode_window = 2;
    let memory = AgentMemory::from_config("sdr-1", &config);
    record_campaign_episodes(&memory).await;

    let mut mock = MockTextGenerator::new();
    mock.expect_generate()
        .withf(|_, messages, _| {
            let text = &messages[0].content;
            text.contains("webinar lead scored 83")
                && text.contains("cold outbound lead scored 33")
                && !text.contains("scored 82")
        })
        .times(1)
        .returning(|_, _, _| Ok(GenerationResponse::text("[]")));

    assert!(memory.reflect(&mock, "").await.unwrap().is_empty());
}

#[test]
fn test_parse_insight_candidates_skips_bad_items() {
    let candidates = parse_insight_candidates(
        r#"[{"content": "kept"}, "a string", {"confidence": 0.9}, {"content": "  "}, {"content": "also kept", "domain": null}]"#,
    );
    let contents: Vec<&str> = candidates.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["kept", "also kept"]);
    assert!(candidates[0].confidence.is_none());
}

#[test]
fn test_build_reflection_prompt() {
    let episodes = vec![
        Episode::new("e1", "send_email")
            .with_domain("marketing")
            .with_summaries("", "sent"),
    ];
    let (system, user) = build_reflection_prompt("", &episodes);
    assert_eq!(system, REFLECTION_INSTRUCTION);
    assert_eq!(
        user,
        "Recent episodes:\n- [marketing] send_email: sent\n\nWhat patterns do you see?"
    );
}

#[tokio::test]
async fn test_publish_to_workspace() {
    let workspace = Arc::new(WorkspaceMemory::new());
    let memory = AgentMemory::new("sdr-1").with_workspace(&workspace);
    memory
        .store_insight(
            Insight::new("i1", "VP sponsor predicts conversion")
                .with_confidence(0.9)
                .with_domain("revenue")
                .with_tags(["enterprise"]),
        )
        .await
        .unwrap();
    memory
        .store_insight(Insight::new("i2", "Maybe Fridays are slow").with_confidence(0.3))
        .await
        .unwrap();

    let published = memory.publish_to_workspace(0.5).await.unwrap();
    assert_eq!(published.len(), 1);
    let fact = &published[0];
    assert_eq!(fact.id, "pub_i1");
    assert_eq!(fact.source, "sdr-1");
    assert_eq!(fact.classification, Classification::Internal);
    assert_eq!(fact.domain, "revenue");
    assert_eq!(fact.tags, vec!["enterprise"]);

    let stored = workspace.get_fact("pub_i1").await.unwrap().unwrap();
    assert_eq!(stored.content, "VP sponsor predicts conversion");
    assert!(workspace.get_fact("pub_i2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_publish_considers_every_insight() {
    let workspace = Arc::new(WorkspaceMemory::new());
    let memory = AgentMemory::new("sdr-1").with_workspace(&workspace);
    for i in 0..120 {
        memory
            .store_insight(
                Insight::new(format!("weak{i}"), format!("hunch {i}")).with_confidence(0.1),
            )
            .await
            .unwrap();
    }
    memory
        .store_insight(Insight::new("strong", "Case studies close deals").with_confidence(0.9))
        .await
        .unwrap();

    let published = memory.publish_to_workspace(0.5).await.unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].id, "pub_strong");
    assert!(workspace.get_fact("pub_strong").await.unwrap().is_some());
}

#[tokio::test]
async fn test_publish_without_workspace_is_noop() {
    let memory = AgentMemory::new("sdr-1");
    memory
        .store_insight(Insight::new("i1", "confident").with_confidence(1.0))
        .await
        .unwrap();
    assert!(memory.publish().await.unwrap().is_empty());

    let workspace = Arc::new(WorkspaceMemory::new());
    let memory = memory.with_workspace(&workspace);
    drop(workspace);
    assert!(memory.workspace().is_none());
    assert!(memory.publish().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_key_value_shim() {
    let memory = AgentMemory::new("sdr-1");
    memory.store("notes", "k1", "prefers email over calls").await.unwrap();
    memory.store("notes", "k2", "timezone is CET").await.unwrap();
    memory.store("other", "k3", "prefers email too").await.unwrap();

    let entries = memory.recall("notes", "email", 10).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key, "k1");
    assert_eq!(entries[0].namespace, "notes");

    assert_eq!(memory.recall("notes", "", 10).await.unwrap().len(), 2);

    memory.delete("notes", "k1").await.unwrap();
    assert_eq!(memory.recall("notes", "", 10).await.unwrap().len(), 2);

    // Shim entries live outside the agent's own insight scope
    assert!(memory.recall_insights(&InsightQuery::new()).await.unwrap().is_empty());
}
