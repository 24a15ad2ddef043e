//! Category labels and the configured category enumeration.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// An opaque, lexically ordered category label (e.g. `Projects`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The fixed set of categories a note may be assigned to, plus an alias
/// table used to normalize free-form labels coming from a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    labels: Vec<Category>,
    aliases: BTreeMap<String, Category>,
}

impl CategorySet {
    /// Build a category set. Labels keep their configured order; duplicates
    /// are dropped. Every alias must point at a configured label.
    pub fn new(
        labels: impl IntoIterator<Item = impl Into<Category>>,
        aliases: &BTreeMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let mut ordered: Vec<Category> = Vec::new();
        for label in labels {
            let label = label.into();
            if label.as_str().trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "categories.labels".to_string(),
                    message: "category labels must not be blank".to_string(),
                });
            }
            if !ordered.contains(&label) {
                ordered.push(label);
            }
        }
        if ordered.is_empty() {
            return Err(ConfigError::MissingCategories);
        }

        let mut alias_map = BTreeMap::new();
        for (alias, target) in aliases {
            let target = Category::new(target.as_str());
            if !ordered.contains(&target) {
                return Err(ConfigError::ValidationFailed {
                    field: format!("categories.aliases.{alias}"),
                    message: format!("alias target '{target}' is not a configured category"),
                });
            }
            alias_map.insert(alias.trim().to_lowercase(), target);
        }

        Ok(Self {
            labels: ordered,
            aliases: alias_map,
        })
    }

    /// Iterate categories in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.labels.iter()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, category: &Category) -> bool {
        self.labels.contains(category)
    }

    /// Comma-separated label list, used in prompts and error messages.
    pub fn joined(&self) -> String {
        self.labels
            .iter()
            .map(Category::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Map a free-form label onto a configured category.
    ///
    /// Matching order: exact label, case-insensitive label, alias table,
    /// singular/plural folding. Returns `None` when nothing matches.
    pub fn normalize(&self, raw: &str) -> Option<Category> {
        let cleaned = raw
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '`' || c == '.');
        if cleaned.is_empty() {
            return None;
        }

        if let Some(exact) = self.labels.iter().find(|c| c.as_str() == cleaned) {
            return Some(exact.clone());
        }

        let lower = cleaned.to_lowercase();
        if let Some(ci) = self.labels.iter().find(|c| c.as_str().to_lowercase() == lower) {
            return Some(ci.clone());
        }

        if let Some(target) = self.aliases.get(&lower) {
            return Some(target.clone());
        }

        let stem = singular(&lower);
        self.labels
            .iter()
            .find(|c| singular(&c.as_str().to_lowercase()) == stem)
            .cloned()
    }
}

fn singular(word: &str) -> &str {
    word.strip_suffix('s').unwrap_or(word)
}
