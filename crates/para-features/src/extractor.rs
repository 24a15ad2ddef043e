//! Feature extraction.

use std::collections::BTreeSet;

use rayon::prelude::*;

use para_core::{CategorySet, FeatureSummary, Note, NoteMetadata};

use crate::frontmatter;
use crate::patterns::{self, count, matches};

const DEADLINE_TAGS: [&str; 3] = ["deadline", "due", "duedate"];
const TASK_TAGS: [&str; 2] = ["todo", "task"];

/// Extract features without category hints.
pub fn extract(note_text: &str, metadata: &NoteMetadata) -> FeatureSummary {
    FeatureExtractor::default().extract(note_text, metadata)
}

/// Feature extractor aware of the configured category labels, so that tags
/// naming a category (`#project`, `#areas`) are surfaced as hints.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    /// Lower-cased labels with their singular forms.
    category_names: BTreeSet<String>,
}

impl FeatureExtractor {
    pub fn new(categories: &CategorySet) -> Self {
        let mut category_names = BTreeSet::new();
        for category in categories.iter() {
            let lower = category.as_str().to_lowercase();
            if let Some(singular) = lower.strip_suffix('s') {
                category_names.insert(singular.to_string());
            }
            category_names.insert(lower);
        }
        Self { category_names }
    }

    /// Derive the feature summary for one note. Never fails.
    pub fn extract(&self, note_text: &str, metadata: &NoteMetadata) -> FeatureSummary {
        let (front, body) = frontmatter::split(note_text);

        let mut tags: BTreeSet<String> = BTreeSet::new();
        for tag in &metadata.tags {
            insert_tag(&mut tags, tag);
        }
        if let Some(front) = front {
            for tag in frontmatter::tags(front) {
                insert_tag(&mut tags, &tag);
            }
        }
        if let Some(re) = patterns::TAG.as_ref() {
            for cap in re.captures_iter(body) {
                if let Some(m) = cap.get(1) {
                    insert_tag(&mut tags, m.as_str());
                }
            }
        }

        let open_task_count = count(&patterns::OPEN_TASK, body);
        let done_task_count = count(&patterns::DONE_TASK, body);
        let has_task_markers = open_task_count > 0
            || done_task_count > 0
            || matches(&patterns::TODO_MARKER, body)
            || TASK_TAGS.iter().any(|t| tags.contains(*t));

        let has_deadline = metadata.deadline.is_some()
            || matches(&patterns::DEADLINE_MARKER, note_text)
            || DEADLINE_TAGS.iter().any(|t| tags.contains(*t));

        let category_hint_tags: BTreeSet<String> = tags
            .iter()
            .filter(|t| self.category_names.contains(t.as_str()))
            .cloned()
            .collect();

        FeatureSummary {
            has_deadline,
            has_task_markers,
            word_count: body.split_whitespace().count(),
            tag_count: tags.len(),
            backlink_count: metadata.backlink_count.unwrap_or(0),
            open_task_count,
            done_task_count,
            wikilink_count: patterns::count_wikilinks(body),
            date_mentions: count(&patterns::ISO_DATE, body) + count(&patterns::SLASH_DATE, body),
            has_attachments: matches(&patterns::ATTACHMENT, body),
            category_hint_tags,
            modified_at: metadata.modified_at,
            tags,
        }
    }

    /// Extract features for many notes in parallel, preserving input order.
    pub fn extract_batch(&self, notes: &[Note]) -> Vec<FeatureSummary> {
        notes
            .par_iter()
            .map(|note| self.extract(&note.text, &note.metadata))
            .collect()
    }
}

fn insert_tag(tags: &mut BTreeSet<String>, raw: &str) {
    let tag = raw.trim().trim_start_matches('#').to_lowercase();
    if !tag.is_empty() {
        tags.insert(tag);
    }
}
