//! Top-level configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{
    CategoriesConfig, ConsensusConfig, EmbeddingConfig, EngineConfig, GenerativeConfig,
    IndexConfig, LearningConfig, StorageConfig,
};
use crate::category::CategorySet;
use crate::constants::{PROJECT_CONFIG_FILE, USER_CONFIG_DIR};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via [`ConfigOverrides`])
/// 2. Environment variables (`PARA_*`)
/// 3. Project config (`para.toml` in the project root)
/// 4. User config (`~/.para/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParaConfig {
    pub categories: CategoriesConfig,
    pub storage: StorageConfig,
    pub embeddings: EmbeddingConfig,
    pub generative: GenerativeConfig,
    pub index: IndexConfig,
    pub consensus: ConsensusConfig,
    pub learning: LearningConfig,
    pub engine: EngineConfig,
}

/// Caller-supplied overrides, the highest priority layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub db_path: Option<String>,
    pub workers: Option<usize>,
    pub single_signal_penalty: Option<f64>,
    pub neighbors_k: Option<usize>,
    pub generative_model: Option<String>,
}

impl ParaConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut merged = toml::Value::Table(toml::map::Map::new());

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                let layer = Self::read_layer(&user_path)?;
                deep_merge(&mut merged, layer);
            }
        }

        let project_path = root.join(PROJECT_CONFIG_FILE);
        if project_path.exists() {
            let layer = Self::read_layer(&project_path)?;
            deep_merge(&mut merged, layer);
        }

        let mut config: ParaConfig =
            merged
                .try_into()
                .map_err(|e: toml::de::Error| ConfigError::ParseError {
                    path: project_path.display().to_string(),
                    message: e.to_string(),
                })?;

        config.apply_env_overrides();
        if let Some(o) = overrides {
            config.apply_overrides(o);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// Build the category set described by the `categories` section.
    pub fn category_set(&self) -> Result<CategorySet, ConfigError> {
        self.categories.to_set()
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.category_set()?;

        check_unit("consensus.single_signal_penalty", self.consensus.single_signal_penalty)?;
        check_unit("index.imbalance_threshold", self.index.imbalance_threshold)?;
        check_unit(
            "engine.auto_apply_min_confidence",
            self.engine.auto_apply_min_confidence,
        )?;
        check_unit("learning.max_step", self.learning.max_step)?;
        if !(0.0..0.5).contains(&self.learning.min_weight) {
            return Err(ConfigError::ValidationFailed {
                field: "learning.min_weight".to_string(),
                message: "must be in [0.0, 0.5)".to_string(),
            });
        }
        if self.consensus.tie_epsilon < 0.0 {
            return Err(ConfigError::ValidationFailed {
                field: "consensus.tie_epsilon".to_string(),
                message: "must not be negative".to_string(),
            });
        }

        check_positive("index.k", self.index.k)?;
        check_positive("engine.workers", self.engine.workers)?;
        check_positive("learning.window", self.learning.window)?;
        check_positive("learning.calibration_buckets", self.learning.calibration_buckets)?;
        check_positive("generative.max_note_chars", self.generative.max_note_chars)?;
        check_positive("embeddings.tfidf_dimensions", self.embeddings.tfidf_dimensions)?;

        if self.generative.timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "generative.timeout_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    /// Pattern: `PARA_INDEX_K`, `PARA_ENGINE_WORKERS`, etc.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PARA_CATEGORIES") {
            let labels: Vec<String> = val
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !labels.is_empty() {
                self.categories.labels = labels;
            }
        }
        if let Ok(val) = std::env::var("PARA_DB_PATH") {
            self.storage.db_path = Some(val);
        }
        if let Ok(val) = std::env::var("PARA_OLLAMA_URL") {
            self.embeddings.ollama_url = val.clone();
            for backend in &mut self.generative.backends {
                if backend.kind == "ollama" {
                    backend.base_url = val.clone();
                }
            }
        }
        if let Ok(val) = std::env::var("PARA_GENERATIVE_MODEL") {
            if let Some(first) = self.generative.backends.first_mut() {
                first.model = val;
            }
        }
        env_parse("PARA_GENERATIVE_TIMEOUT_SECS", &mut self.generative.timeout_secs);
        env_parse("PARA_INDEX_K", &mut self.index.k);
        env_parse(
            "PARA_CONSENSUS_PENALTY",
            &mut self.consensus.single_signal_penalty,
        );
        env_parse("PARA_ENGINE_WORKERS", &mut self.engine.workers);
        env_parse("PARA_LEARNING_WINDOW", &mut self.learning.window);
        env_parse("PARA_LEARNING_MAX_STEP", &mut self.learning.max_step);
    }

    /// Apply explicit overrides (highest priority).
    fn apply_overrides(&mut self, o: &ConfigOverrides) {
        if let Some(ref v) = o.db_path {
            self.storage.db_path = Some(v.clone());
        }
        if let Some(v) = o.workers {
            self.engine.workers = v;
        }
        if let Some(v) = o.single_signal_penalty {
            self.consensus.single_signal_penalty = v;
        }
        if let Some(v) = o.neighbors_k {
            self.index.k = v;
        }
        if let Some(ref v) = o.generative_model {
            if let Some(first) = self.generative.backends.first_mut() {
                first.model = v.clone();
            }
        }
    }

    fn read_layer(path: &Path) -> Result<toml::Value, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        content
            .parse::<toml::Value>()
            .map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })
    }

    /// Returns the user config path: `~/.para/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(USER_CONFIG_DIR).join("config.toml"))
    }
}

/// Merge `layer` into `base`. Tables merge key by key; every other value in
/// `layer` replaces the one in `base`.
fn deep_merge(base: &mut toml::Value, layer: toml::Value) {
    match (base, layer) {
        (toml::Value::Table(base_table), toml::Value::Table(layer_table)) => {
            for (key, value) in layer_table {
                match base_table.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn env_parse<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(val) = std::env::var(var) {
        match val.parse::<T>() {
            Ok(v) => *target = v,
            Err(_) => warn!(var, value = %val, "ignoring unparseable environment override"),
        }
    }
}

fn check_unit(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::ValidationFailed {
            field: field.to_string(),
            message: "must be between 0.0 and 1.0".to_string(),
        });
    }
    Ok(())
}

fn check_positive(field: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ValidationFailed {
            field: field.to_string(),
            message: "must be greater than 0".to_string(),
        });
    }
    Ok(())
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
