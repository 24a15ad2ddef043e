use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable structural summary of a note, derived by the feature extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSummary {
    pub has_deadline: bool,
    pub has_task_markers: bool,
    pub word_count: usize,
    pub tag_count: usize,
    pub backlink_count: u32,
    /// Lower-cased tags without the leading `#`.
    pub tags: BTreeSet<String>,
    pub open_task_count: usize,
    pub done_task_count: usize,
    pub wikilink_count: usize,
    pub date_mentions: usize,
    pub has_attachments: bool,
    /// Tags that name a configured category (e.g. `#project`).
    pub category_hint_tags: BTreeSet<String>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl FeatureSummary {
    /// Single-line description used in generative prompts and logs.
    pub fn describe(&self) -> String {
        let mut parts = vec![
            format!("words={}", self.word_count),
            format!("tags={}", self.tag_count),
            format!("backlinks={}", self.backlink_count),
            format!("deadline={}", self.has_deadline),
            format!(
                "tasks={} open/{} done",
                self.open_task_count, self.done_task_count
            ),
            format!("wikilinks={}", self.wikilink_count),
            format!("dates={}", self.date_mentions),
        ];
        if self.has_attachments {
            parts.push("attachments=true".to_string());
        }
        if !self.tags.is_empty() {
            let tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
            parts.push(format!("tag_set=[{}]", tags.join(", ")));
        }
        if !self.category_hint_tags.is_empty() {
            let hints: Vec<&str> = self.category_hint_tags.iter().map(String::as_str).collect();
            parts.push(format!("category_hints=[{}]", hints.join(", ")));
        }
        parts.join("; ")
    }
}
