use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::defaults;
use crate::category::CategorySet;
use crate::errors::ConfigError;

/// The category enumeration and the alias table used to normalize labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoriesConfig {
    pub labels: Vec<String>,
    /// Lower-case free-form label -> configured label.
    pub aliases: BTreeMap<String, String>,
}

impl CategoriesConfig {
    /// Aliases pointing at labels that are not configured are skipped, so a
    /// custom label list does not trip over the default alias table.
    pub fn to_set(&self) -> Result<CategorySet, ConfigError> {
        let aliases: BTreeMap<String, String> = self
            .aliases
            .iter()
            .filter(|(alias, target)| {
                let known = self.labels.iter().any(|l| l == *target);
                if !known {
                    warn!(alias = %alias, target = %target, "skipping alias for unconfigured category");
                }
                known
            })
            .map(|(a, t)| (a.clone(), t.clone()))
            .collect();
        CategorySet::new(self.labels.iter().map(String::as_str), &aliases)
    }
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            labels: defaults::DEFAULT_CATEGORIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            aliases: defaults::DEFAULT_CATEGORY_ALIASES
                .iter()
                .map(|(a, t)| (a.to_string(), t.to_string()))
                .collect(),
        }
    }
}
