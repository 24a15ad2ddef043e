// Single source of truth for all default values.

// --- Categories ---
pub const DEFAULT_CATEGORIES: [&str; 4] = ["Projects", "Areas", "Resources", "Archive"];

/// Free-form labels a model tends to produce, mapped to the default set.
pub const DEFAULT_CATEGORY_ALIASES: [(&str, &str); 24] = [
    ("project", "Projects"),
    ("task", "Projects"),
    ("tasks", "Projects"),
    ("goal", "Projects"),
    ("deadline", "Projects"),
    ("client", "Projects"),
    ("area", "Areas"),
    ("health", "Areas"),
    ("finance", "Areas"),
    ("career", "Areas"),
    ("habit", "Areas"),
    ("responsibility", "Areas"),
    ("resource", "Resources"),
    ("reference", "Resources"),
    ("guide", "Resources"),
    ("tutorial", "Resources"),
    ("documentation", "Resources"),
    ("research", "Resources"),
    ("archived", "Archive"),
    ("completed", "Archive"),
    ("done", "Archive"),
    ("old", "Archive"),
    ("obsolete", "Archive"),
    ("deprecated", "Archive"),
];

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "para.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_PROVIDERS: [&str; 2] = ["ollama", "tfidf"];
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 768;
pub const DEFAULT_TFIDF_DIMENSIONS: usize = 384;
pub const DEFAULT_L1_CACHE_SIZE: u64 = 10_000;
pub const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 30;

// --- Generative ---
pub const DEFAULT_GENERATIVE_MODEL: &str = "llama3.2:3b";
pub const DEFAULT_GENERATIVE_TIMEOUT_SECS: u64 = 45;
pub const DEFAULT_MAX_NOTE_CHARS: usize = 4_000;
pub const DEFAULT_GENERATIVE_TEMPERATURE: f64 = 0.1;

// --- Semantic index ---
pub const DEFAULT_NEIGHBORS_K: usize = 10;
pub const DEFAULT_IMBALANCE_THRESHOLD: f64 = 0.6;

// --- Consensus ---
pub const DEFAULT_SINGLE_SIGNAL_PENALTY: f64 = 0.8;
pub const DEFAULT_TIE_EPSILON: f64 = 1e-9;

// --- Learning ---
pub const DEFAULT_LEARNING_WINDOW: usize = 500;
pub const DEFAULT_MAX_WEIGHT_STEP: f64 = 0.1;
pub const DEFAULT_MIN_SOURCE_WEIGHT: f64 = 0.1;
pub const DEFAULT_MIN_CATEGORY_SAMPLES: usize = 20;
pub const DEFAULT_CALIBRATION_BUCKETS: usize = 10;
pub const DEFAULT_MIN_BUCKET_SAMPLES: usize = 5;

// --- Engine ---
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_AUTO_APPLY_MIN_CONFIDENCE: f64 = 0.0;
pub const DEFAULT_REQUIRE_REVIEW_ON_DISCREPANCY: bool = true;
