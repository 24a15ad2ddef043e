use serde::{Deserialize, Serialize};

use super::defaults;

/// One generative backend in the fallback list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerativeBackendConfig {
    /// Backend kind. Only "ollama" ships in this workspace.
    pub kind: String,
    pub base_url: String,
    pub model: String,
}

impl Default for GenerativeBackendConfig {
    fn default() -> Self {
        Self {
            kind: "ollama".to_string(),
            base_url: defaults::DEFAULT_OLLAMA_URL.to_string(),
            model: defaults::DEFAULT_GENERATIVE_MODEL.to_string(),
        }
    }
}

/// Generative classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerativeConfig {
    /// Backends tried in order until one answers.
    pub backends: Vec<GenerativeBackendConfig>,
    /// Per-backend request timeout.
    pub timeout_secs: u64,
    /// Note content beyond this many characters is cut from the prompt.
    pub max_note_chars: usize,
    pub temperature: f64,
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            backends: vec![GenerativeBackendConfig::default()],
            timeout_secs: defaults::DEFAULT_GENERATIVE_TIMEOUT_SECS,
            max_note_chars: defaults::DEFAULT_MAX_NOTE_CHARS,
            temperature: defaults::DEFAULT_GENERATIVE_TEMPERATURE,
        }
    }
}
