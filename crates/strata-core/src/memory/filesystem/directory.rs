//! Generated `.directory` summaries

use super::core::{LISTING_LIMIT, MemoryFilesystem};
use super::paths::{SOUL_FILE, Section, domain_dir, section_of};
use crate::memory::types::{Insight, InsightQuery};
use std::collections::BTreeMap;

const EMPTY: &str = "(empty)";
const UNAVAILABLE: &str = "(not yet available)";

/// First `max` characters of `text`
fn preview(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Group insights by knowledge directory
fn by_domain(insights: Vec<Insight>) -> BTreeMap<String, Vec<Insight>> {
    let mut groups: BTreeMap<String, Vec<Insight>> = BTreeMap::new();
    for insight in insights {
        let key = domain_dir(&insight.domain).to_string();
        groups.entry(key).or_default().push(insight);
    }
    groups
}

impl MemoryFilesystem {
    fn soul_headline(&self) -> Option<String> {
        if self.soul.is_empty() {
            return None;
        }
        let first_line = self.soul.lines().next().unwrap_or_default();
        Some(preview(first_line, 80))
    }

    /// Overview of every top-level directory
    pub(super) async fn directory_root(&self) -> String {
        let insights = self.insights(InsightQuery::new().limit(usize::MAX)).await;
        let episodes = self.recent_episodes(usize::MAX).await;

        let mut lines = Vec::with_capacity(Section::ALL.len());

        lines.push(match self.soul_headline() {
            Some(headline) => format!("identity/   - {}", headline),
            None => format!("identity/   - {}", EMPTY),
        });

        if insights.is_empty() {
            lines.push(format!("knowledge/  - {}", EMPTY));
        } else {
            let total = insights.len();
            let summary: Vec<String> = by_domain(insights)
                .iter()
                .map(|(domain, items)| format!("{} ({})", domain, items.len()))
                .collect();
            lines.push(format!(
                "knowledge/  - {}: {}",
                plural(total, "insight"),
                summary.join(", ")
            ));
        }

        if episodes.is_empty() {
            lines.push(format!("experience/ - {}", EMPTY));
        } else {
            lines.push(format!("experience/ - {}", plural(episodes.len(), "episode")));
        }

        lines.push(format!("references/ - {}", UNAVAILABLE));
        lines.join("\n")
    }

    /// Summary for the directory named by `parts`
    pub(super) async fn directory_for(&self, parts: &[&str]) -> String {
        if parts.is_empty() {
            return self.directory_root().await;
        }
        match section_of(parts) {
            Some(Section::Identity) => match self.soul_headline() {
                Some(headline) => format!("{} - {}", SOUL_FILE, headline),
                None => EMPTY.to_string(),
            },
            Some(Section::Knowledge) => match parts.get(1) {
                None => self.directory_knowledge().await,
                Some(domain) => self.directory_domain(domain).await,
            },
            Some(Section::Experience) => self.directory_experience().await,
            Some(Section::References) => UNAVAILABLE.to_string(),
            None => String::new(),
        }
    }

    /// Per-domain counts with up to three previews each
    async fn directory_knowledge(&self) -> String {
        let insights = self.insights(InsightQuery::new().limit(usize::MAX)).await;
        if insights.is_empty() {
            return EMPTY.to_string();
        }
        by_domain(insights)
            .iter()
            .map(|(domain, items)| {
                let previews: Vec<String> = items
                    .iter()
                    .take(3)
                    .map(|i| format!("\"{}\"", preview(&i.content, 50)))
                    .collect();
                format!(
                    "{}/ - {}: {}",
                    domain,
                    plural(items.len(), "insight"),
                    previews.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn directory_domain(&self, dir: &str) -> String {
        let insights = self
            .domain_insights(dir, InsightQuery::new().limit(usize::MAX))
            .await;
        if insights.is_empty() {
            return EMPTY.to_string();
        }
        insights
            .iter()
            .map(|i| {
                format!(
                    "{} - \"{}\" (confidence: {})",
                    i.id,
                    preview(&i.content, 60),
                    i.confidence
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn directory_experience(&self) -> String {
        let episodes = self.recent_episodes(LISTING_LIMIT).await;
        if episodes.is_empty() {
            return EMPTY.to_string();
        }
        episodes
            .iter()
            .map(|e| format!("{} - {} ({}) {}ms", e.id, e.action, e.operator_id, e.duration_ms))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
