//! Test fixtures for the PARA engine: golden JSON datasets, builders for
//! the shared data model, and stub collaborators (generative backends,
//! vector stores, embedding providers) with scripted behavior.

pub mod builders;
pub mod stubs;

pub use builders::*;
pub use stubs::*;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use para_core::NoteMetadata;

/// Root of the golden data directory (`fixtures/` at the workspace root).
fn fixtures_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);
    while !path.join("fixtures").join("notes").is_dir() {
        if !path.pop() {
            panic!("Could not find fixtures directory from CARGO_MANIFEST_DIR={manifest_dir}");
        }
    }
    path.join("fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// A note from `notes/sample_vault.json` with its expected category.
#[derive(Debug, Clone, Deserialize)]
pub struct GoldenNote {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: NoteMetadata,
    pub expected_category: Option<String>,
}

impl GoldenNote {
    pub fn to_note(&self) -> para_core::Note {
        para_core::Note::new(&self.id, &self.text).with_metadata(self.metadata.clone())
    }
}

pub fn sample_vault() -> Vec<GoldenNote> {
    load_fixture("notes/sample_vault.json")
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerativeFixture {
    pub category: String,
    pub confidence: f64,
}

/// One row of `scenarios/consensus.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsensusScenario {
    pub name: String,
    /// `None` means the semantic index was unreachable.
    pub semantic: Option<Vec<(String, f64)>>,
    /// `None` means the generative classifier was unavailable.
    pub generative: Option<GenerativeFixture>,
    pub expected_category: Option<String>,
    pub expected_confidence: f64,
    /// Blended score per category, when both signals are present.
    #[serde(default)]
    pub expected_blend: Vec<(String, f64)>,
    pub discrepancy: bool,
}

pub fn consensus_scenarios() -> Vec<ConsensusScenario> {
    load_fixture("scenarios/consensus.json")
}
