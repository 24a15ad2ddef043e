//! Stub collaborators with scripted behavior.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::ThreadId;
use std::time::Duration;

use async_trait::async_trait;

use para_core::errors::{ClassifierError, EmbeddingError, ParaResult, StorageError};
use para_core::traits::{IEmbeddingProvider, IVectorStore, Neighbor, VectorRecord};
use para_core::Category;
use para_generative::{CompletionRequest, GenerativeBackend};

/// One scripted backend reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    /// `{"category": .., "confidence": ..}` for the given values.
    Json(String, f64),
    Transport,
    /// Sleep this long before answering with an empty string.
    Hang(Duration),
}

impl MockReply {
    pub fn json(category: &str, confidence: f64) -> Self {
        Self::Json(category.to_string(), confidence)
    }
}

/// Generative backend that plays back a script. When the script runs out
/// it repeats `fallback`, or fails with a transport error if none is set.
pub struct ScriptedBackend {
    name: String,
    script: Mutex<VecDeque<MockReply>>,
    fallback: Option<MockReply>,
    calls: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedBackend {
    pub fn new(name: &str, script: Vec<MockReply>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            script: Mutex::new(script.into()),
            fallback: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Always answer with `reply`.
    pub fn always(name: &str, reply: MockReply) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            script: Mutex::new(VecDeque::new()),
            fallback: Some(reply),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut log) = self.requests.lock() {
            log.push(request.clone());
        }
        let next = self
            .script
            .lock()
            .ok()
            .and_then(|mut s| s.pop_front())
            .or_else(|| self.fallback.clone());
        match next {
            Some(MockReply::Text(t)) => Ok(t),
            Some(MockReply::Json(c, conf)) => Ok(format!(
                r#"{{"category": "{c}", "confidence": {conf}, "rationale": "scripted"}}"#
            )),
            Some(MockReply::Hang(d)) => {
                tokio::time::sleep(d).await;
                Ok(String::new())
            }
            Some(MockReply::Transport) | None => Err(ClassifierError::Transport {
                backend: self.name.clone(),
                reason: "connection refused".to_string(),
            }),
        }
    }
}

/// Generative backend that answers from the note content alone: the first
/// rule whose keyword appears in the note wins. Notes matching no rule get
/// prose back, which never parses.
pub struct RoutingBackend {
    rules: Vec<(String, String)>,
    confidence: f64,
    calls: AtomicUsize,
}

impl RoutingBackend {
    pub fn new(rules: &[(&str, &str)], confidence: f64) -> Arc<Self> {
        Arc::new(Self {
            rules: rules
                .iter()
                .map(|(k, c)| (k.to_lowercase(), c.to_string()))
                .collect(),
            confidence,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeBackend for RoutingBackend {
    fn name(&self) -> &str {
        "routing-stub"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let content = request
            .user
            .split_once("Note content:")
            .map(|(_, c)| c)
            .unwrap_or(&request.user)
            .to_lowercase();
        let routed = self
            .rules
            .iter()
            .find(|(keyword, _)| content.contains(keyword.as_str()));
        Ok(match routed {
            Some((_, category)) => format!(
                r#"{{"category": "{category}", "confidence": {}, "rationale": "keyword"}}"#,
                self.confidence
            ),
            None => "I cannot tell what this note is about.".to_string(),
        })
    }
}

/// Vector store that answers every query with the same neighbors and
/// records upserts along with the thread that made them.
#[derive(Default)]
pub struct StaticVectorStore {
    neighbors: Vec<Neighbor>,
    upserts: Mutex<Vec<VectorRecord>>,
    upsert_threads: Mutex<Vec<ThreadId>>,
}

impl StaticVectorStore {
    pub fn new(neighbors: &[(&str, &str, f64)]) -> Self {
        Self {
            neighbors: neighbors
                .iter()
                .map(|(id, cat, sim)| Neighbor {
                    note_id: id.to_string(),
                    category: Category::new(*cat),
                    similarity: *sim,
                })
                .collect(),
            upserts: Mutex::new(Vec::new()),
            upsert_threads: Mutex::new(Vec::new()),
        }
    }

    pub fn upserts(&self) -> Vec<VectorRecord> {
        self.upserts.lock().map(|u| u.clone()).unwrap_or_default()
    }

    pub fn upsert_threads(&self) -> Vec<ThreadId> {
        self.upsert_threads
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }
}

impl IVectorStore for StaticVectorStore {
    fn upsert_vector(&self, record: &VectorRecord) -> ParaResult<()> {
        if let Ok(mut u) = self.upserts.lock() {
            u.push(record.clone());
        }
        if let Ok(mut t) = self.upsert_threads.lock() {
            t.push(std::thread::current().id());
        }
        Ok(())
    }

    fn nearest(&self, _embedding: &[f32], k: usize) -> ParaResult<Vec<Neighbor>> {
        Ok(self.neighbors.iter().take(k).cloned().collect())
    }

    fn get_vector(&self, note_id: &str) -> ParaResult<Option<VectorRecord>> {
        Ok(self
            .upserts()
            .into_iter()
            .rev()
            .find(|r| r.note_id == note_id))
    }

    fn count_by_category(&self) -> ParaResult<BTreeMap<Category, u64>> {
        let mut counts = BTreeMap::new();
        for n in &self.neighbors {
            *counts.entry(n.category.clone()).or_default() += 1;
        }
        Ok(counts)
    }
}

/// Vector store whose backing file is unreachable.
pub struct UnavailableVectorStore;

impl UnavailableVectorStore {
    fn err() -> para_core::ParaError {
        StorageError::Sqlite {
            message: "unable to open database file".to_string(),
        }
        .into()
    }
}

impl IVectorStore for UnavailableVectorStore {
    fn upsert_vector(&self, _record: &VectorRecord) -> ParaResult<()> {
        Err(Self::err())
    }

    fn nearest(&self, _embedding: &[f32], _k: usize) -> ParaResult<Vec<Neighbor>> {
        Err(Self::err())
    }

    fn get_vector(&self, _note_id: &str) -> ParaResult<Option<VectorRecord>> {
        Err(Self::err())
    }

    fn count_by_category(&self) -> ParaResult<BTreeMap<Category, u64>> {
        Err(Self::err())
    }
}

/// Deterministic embedder: one dimension per keyword, holding its count.
/// Texts sharing vocabulary land close together.
pub struct KeywordEmbedder {
    keywords: Vec<String>,
}

impl KeywordEmbedder {
    pub fn new(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Vocabulary loosely aligned with the PARA categories.
    pub fn para() -> Self {
        Self::new(&[
            "deadline", "launch", "task", "health", "gym", "budget", "reference", "guide",
            "recipe", "done", "archived", "old",
        ])
    }
}

impl IEmbeddingProvider for KeywordEmbedder {
    fn embed(&self, text: &str) -> ParaResult<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(self
            .keywords
            .iter()
            .map(|k| lower.matches(k.as_str()).count() as f32)
            .collect())
    }

    fn embed_batch(&self, texts: &[String]) -> ParaResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimensions(&self) -> usize {
        self.keywords.len()
    }

    fn name(&self) -> &str {
        "keyword-stub"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Embedding provider that always fails.
pub struct BrokenEmbedder;

impl IEmbeddingProvider for BrokenEmbedder {
    fn embed(&self, _text: &str) -> ParaResult<Vec<f32>> {
        Err(EmbeddingError::InferenceFailed {
            reason: "model crashed".to_string(),
        }
        .into())
    }

    fn embed_batch(&self, _texts: &[String]) -> ParaResult<Vec<Vec<f32>>> {
        Err(EmbeddingError::InferenceFailed {
            reason: "model crashed".to_string(),
        }
        .into())
    }

    fn dimensions(&self) -> usize {
        8
    }

    fn name(&self) -> &str {
        "broken"
    }

    fn is_available(&self) -> bool {
        true
    }
}
