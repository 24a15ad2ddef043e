use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Caller-supplied metadata about a note. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteMetadata {
    /// Frontmatter tags, with or without a leading `#`.
    pub tags: Vec<String>,
    pub deadline: Option<NaiveDate>,
    pub modified_at: Option<DateTime<Utc>>,
    pub backlink_count: Option<u32>,
}

/// A note as handed to the engine. Owned by the caller; never deleted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Stable identifier: a vault-relative path or a content hash.
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: NoteMetadata,
    #[serde(default)]
    pub current_category: Option<Category>,
    #[serde(default)]
    pub last_classified_at: Option<DateTime<Utc>>,
}

impl Note {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: NoteMetadata::default(),
            current_category: None,
            last_classified_at: None,
        }
    }

    pub fn with_metadata(mut self, metadata: NoteMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_category(mut self, category: impl Into<Category>) -> Self {
        self.current_category = Some(category.into());
        self
    }

    /// blake3 hex digest of the note text.
    pub fn content_hash(&self) -> String {
        blake3::hash(self.text.as_bytes()).to_hex().to_string()
    }
}
