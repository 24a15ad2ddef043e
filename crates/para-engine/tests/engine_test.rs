//! End-to-end engine tests over stub backends, stub embedders and an
//! in-memory storage engine.

use std::sync::Arc;
use std::time::Duration;

use para_core::errors::{ParaError, PlanError};
use para_core::traits::{Cancellable, IEmbeddingProvider, ILearningStorage, IVectorStore};
use para_core::{CancellationToken, Category, DecisionOutcome, FeedbackSource, Note, ParaConfig};
use para_engine::{ClassificationEngine, EngineBuilder, EntryState, PlanMode};
use para_generative::GenerativeBackend;
use para_storage::StorageEngine;
use test_fixtures::{
    synthetic_history, KeywordEmbedder, MockReply, ScriptedBackend, StaticVectorStore,
    UnavailableVectorStore,
};

fn config() -> ParaConfig {
    let mut config = ParaConfig::default();
    config.storage.db_path = None;
    config
}

fn keyword_embedder() -> Vec<Box<dyn IEmbeddingProvider>> {
    vec![Box::new(KeywordEmbedder::para())]
}

fn build(
    backend: Arc<ScriptedBackend>,
    vectors: Arc<dyn IVectorStore>,
    learning: Arc<dyn ILearningStorage>,
) -> ClassificationEngine {
    EngineBuilder::new(config())
        .with_backends(vec![backend as Arc<dyn GenerativeBackend>])
        .with_embedding_providers(keyword_embedder())
        .with_vector_store(vectors)
        .with_learning_storage(learning)
        .build()
        .unwrap()
}

fn with_storage(backend: Arc<ScriptedBackend>) -> (ClassificationEngine, Arc<StorageEngine>) {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let engine = build(backend, storage.clone(), storage.clone());
    (engine, storage)
}

fn areas_index() -> Arc<StaticVectorStore> {
    Arc::new(StaticVectorStore::new(&[
        ("gym-log", "Areas", 0.9),
        ("budget", "Areas", 0.8),
    ]))
}

fn notes(n: usize) -> Vec<Note> {
    (0..n)
        .map(|i| Note::new(format!("note-{i}"), format!("launch task {i} before the deadline")))
        .collect()
}

#[tokio::test]
async fn preview_produces_one_entry_per_note_in_order() {
    let backend = ScriptedBackend::always("stub", MockReply::json("Projects", 0.9));
    let (engine, storage) = with_storage(backend.clone());

    let plan = engine.classify(notes(6), None, PlanMode::Preview).await.unwrap();

    let ids: Vec<&str> = plan.entries.iter().map(|e| e.note_id.as_str()).collect();
    assert_eq!(ids, vec!["note-0", "note-1", "note-2", "note-3", "note-4", "note-5"]);
    assert!(plan.entries.iter().all(|e| e.state == EntryState::Proposed));
    assert_eq!(backend.calls(), 6);
    assert_eq!(storage.feedback_count().unwrap(), 0);
    assert_eq!(engine.plan(&plan.id).unwrap(), plan);
}

#[tokio::test]
async fn preview_plans_reject_confirmation() {
    let backend = ScriptedBackend::always("stub", MockReply::json("Projects", 0.9));
    let (engine, _storage) = with_storage(backend);
    let plan = engine.classify(notes(1), None, PlanMode::Preview).await.unwrap();

    let err = engine.confirm(&plan.entries[0].id, "Projects").unwrap_err();
    assert!(matches!(err, ParaError::Plan(PlanError::PreviewOnly { .. })));
}

#[tokio::test]
async fn empty_index_decides_on_generative_alone() {
    let backend = ScriptedBackend::always("stub", MockReply::json("Projects", 0.9));
    let (engine, storage) = with_storage(backend);

    let plan = engine.classify(notes(1), None, PlanMode::Apply).await.unwrap();
    let entry = &plan.entries[0];

    assert_eq!(entry.decision.outcome, DecisionOutcome::GenerativeOnly);
    assert_eq!(entry.decision.category, Some(Category::new("Projects")));
    assert!((entry.decision.confidence - 0.72).abs() < 1e-9);
    assert_eq!(entry.state, EntryState::Applied);
    assert!(entry.feedback_seq.is_some());

    let history = storage.recent_feedback(10).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].source, FeedbackSource::AutoAccepted);
    assert_eq!(storage.vector_count().unwrap(), 1);
    assert_eq!(engine.index_stats().unwrap().total, 1);
}

#[tokio::test]
async fn apply_pass_writes_off_the_async_thread() {
    let backend = ScriptedBackend::always("stub", MockReply::json("Projects", 0.9));
    let index = Arc::new(StaticVectorStore::default());
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let engine = build(backend, index.clone(), storage.clone());

    let plan = engine.classify(notes(2), None, PlanMode::Apply).await.unwrap();
    assert!(plan.entries.iter().all(|e| e.state == EntryState::Applied));
    assert_eq!(storage.feedback_count().unwrap(), 2);

    // The test body runs on the current-thread runtime's only worker.
    let runtime_thread = std::thread::current().id();
    let threads = index.upsert_threads();
    assert_eq!(threads.len(), 2);
    assert!(threads.iter().all(|t| *t != runtime_thread));
}

#[tokio::test]
async fn applied_notes_feed_later_semantic_votes() {
    let backend = ScriptedBackend::always("stub", MockReply::json("Projects", 0.9));
    let (engine, _storage) = with_storage(backend);

    engine.classify(notes(1), None, PlanMode::Apply).await.unwrap();
    let plan = engine
        .classify(vec![Note::new("later", "launch task deadline")], None, PlanMode::Preview)
        .await
        .unwrap();

    let decision = &plan.entries[0].decision;
    assert_eq!(decision.outcome, DecisionOutcome::Consensus);
    assert_eq!(
        decision.semantic.top_category(),
        Some(&Category::new("Projects"))
    );
    assert!(!decision.discrepancy);
}

#[tokio::test]
async fn discrepancy_waits_for_review_then_confirm_writes_index() {
    let backend = ScriptedBackend::always("stub", MockReply::json("Projects", 0.9));
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let index = areas_index();
    let engine = build(backend, index.clone(), storage.clone());

    let plan = engine.classify(notes(1), None, PlanMode::Apply).await.unwrap();
    let entry = &plan.entries[0];
    assert!(entry.decision.discrepancy);
    assert_eq!(entry.decision.category, Some(Category::new("Projects")));
    assert_eq!(entry.state, EntryState::Proposed);
    assert_eq!(storage.feedback_count().unwrap(), 0);

    engine.confirm(&entry.id, "area").unwrap();

    let plan = engine.plan(&plan.id).unwrap();
    assert_eq!(plan.entries[0].state, EntryState::Applied);
    assert_eq!(plan.entries[0].applied_category, Some(Category::new("Areas")));
    let record = storage.recent_feedback(1).unwrap().remove(0);
    assert_eq!(record.source, FeedbackSource::UserCorrected);
    assert_eq!(record.confirmed, Some(Category::new("Areas")));

    let upserts = index.upserts();
    assert_eq!(upserts.len(), 1);
    assert_eq!(upserts[0].note_id, "note-0");
    assert_eq!(upserts[0].category, Category::new("Areas"));
}

#[tokio::test]
async fn both_signals_down_is_undecidable_until_confirmed() {
    let backend = ScriptedBackend::always("stub", MockReply::Transport);
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let engine = build(backend, Arc::new(UnavailableVectorStore), storage.clone());

    let plan = engine.classify(notes(1), None, PlanMode::Apply).await.unwrap();
    let entry = &plan.entries[0];
    assert_eq!(entry.decision.outcome, DecisionOutcome::Undecidable);
    assert_eq!(entry.decision.category, None);
    assert_eq!(entry.decision.confidence, 0.0);
    assert_eq!(entry.state, EntryState::Undecidable);
    assert_eq!(plan.summary().undecidable, 1);

    // Index write fails; the confirmation still lands.
    engine.confirm(&entry.id, "Projects").unwrap();
    let plan = engine.plan(&plan.id).unwrap();
    assert_eq!(plan.entries[0].state, EntryState::Applied);
    assert_eq!(
        storage.recent_feedback(1).unwrap()[0].source,
        FeedbackSource::UserCorrected
    );

    let components: Vec<String> = engine
        .degradation_events()
        .into_iter()
        .map(|t| t.event.component)
        .collect();
    assert!(components.contains(&"generative".to_string()));
    assert!(components.contains(&"semantic-index".to_string()));
}

#[tokio::test]
async fn generative_outage_closes_when_the_backend_answers_again() {
    let backend = ScriptedBackend::new(
        "stub",
        vec![
            MockReply::Transport,
            MockReply::Transport,
            MockReply::json("Areas", 0.7),
        ],
    );
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let engine = build(backend, areas_index(), storage);

    engine.classify(notes(1), None, PlanMode::Preview).await.unwrap();
    engine.classify(notes(1), None, PlanMode::Preview).await.unwrap();
    assert_eq!(engine.degraded_components(), vec!["generative".to_string()]);
    let episodes = engine.degradation_events();
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].occurrences, 2);

    engine.classify(notes(1), None, PlanMode::Preview).await.unwrap();
    assert!(engine.degraded_components().is_empty());
    assert!(!engine.degradation_events()[0].is_active());
}

#[tokio::test]
async fn confirming_the_proposal_records_user_confirmed() {
    let backend = ScriptedBackend::always("stub", MockReply::json("Projects", 0.9));
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let engine = build(backend, areas_index(), storage.clone());

    let plan = engine.classify(notes(1), None, PlanMode::Apply).await.unwrap();
    engine.confirm(&plan.entries[0].id, "projects").unwrap();

    let record = storage.recent_feedback(1).unwrap().remove(0);
    assert_eq!(record.source, FeedbackSource::UserConfirmed);
}

#[tokio::test]
async fn reject_is_terminal() {
    let backend = ScriptedBackend::always("stub", MockReply::json("Projects", 0.9));
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let engine = build(backend, areas_index(), storage.clone());

    let note = Note::new("n", "weekly gym routine").with_category("Areas");
    let plan = engine.classify(vec![note], None, PlanMode::Apply).await.unwrap();
    let entry_id = plan.entries[0].id.clone();

    engine.reject(&entry_id).unwrap();
    let record = storage.recent_feedback(1).unwrap().remove(0);
    assert_eq!(record.source, FeedbackSource::Rejected);
    assert_eq!(record.confirmed, Some(Category::new("Areas")));

    assert!(matches!(
        engine.reject(&entry_id),
        Err(ParaError::Plan(PlanError::InvalidTransition { .. }))
    ));
    assert!(matches!(
        engine.confirm(&entry_id, "Projects"),
        Err(ParaError::Plan(PlanError::InvalidTransition { .. }))
    ));
    assert_eq!(storage.feedback_count().unwrap(), 1);
}

#[tokio::test]
async fn unknown_entries_and_categories_are_rejected() {
    let backend = ScriptedBackend::always("stub", MockReply::json("Projects", 0.9));
    let (engine, _storage) = with_storage(backend);
    let plan = engine.classify(notes(1), None, PlanMode::Apply).await.unwrap();

    assert!(matches!(
        engine.confirm("no-such-entry", "Projects"),
        Err(ParaError::Plan(PlanError::UnknownEntry { .. }))
    ));
    assert!(matches!(
        engine.confirm(&plan.entries[0].id, "Someday"),
        Err(ParaError::Plan(PlanError::UnknownCategory { .. }))
    ));
}

#[tokio::test]
async fn cancelled_apply_leaves_entries_proposed() {
    let backend = ScriptedBackend::always("stub", MockReply::json("Projects", 0.9));
    let (engine, storage) = with_storage(backend);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let plan = engine
        .classify_with_cancel(notes(3), None, PlanMode::Apply, &cancel)
        .await
        .unwrap();

    assert!(plan.entries.iter().all(|e| e.state == EntryState::Proposed));
    assert_eq!(storage.feedback_count().unwrap(), 0);
    assert_eq!(storage.vector_count().unwrap(), 0);
}

#[tokio::test]
async fn custom_instruction_reaches_the_backend() {
    let backend = ScriptedBackend::always("stub", MockReply::json("Resources", 0.6));
    let (engine, _storage) = with_storage(backend.clone());

    let plan = engine
        .classify(
            notes(1),
            Some("Treat recipes as Resources.".to_string()),
            PlanMode::Preview,
        )
        .await
        .unwrap();

    assert_eq!(plan.custom_instruction.as_deref(), Some("Treat recipes as Resources."));
    let requests = backend.requests();
    assert!(requests[0].system.contains("Treat recipes as Resources."));
}

#[tokio::test]
async fn hanging_backend_times_out_to_semantic_only() {
    let backend = ScriptedBackend::always("slow", MockReply::Hang(Duration::from_secs(30)));
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let engine = EngineBuilder::new(config())
        .with_backends(vec![backend as Arc<dyn GenerativeBackend>])
        .with_embedding_providers(keyword_embedder())
        .with_vector_store(areas_index())
        .with_learning_storage(storage)
        .with_generative_timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let plan = engine.classify(notes(1), None, PlanMode::Preview).await.unwrap();
    let decision = &plan.entries[0].decision;
    assert_eq!(decision.outcome, DecisionOutcome::SemanticOnly);
    assert_eq!(decision.category, Some(Category::new("Areas")));
    assert!((decision.confidence - 0.85 * 0.8).abs() < 1e-9);
    assert!(!decision.generative.is_available());
}

#[tokio::test]
async fn recompute_learns_from_feedback_and_is_idempotent() {
    let backend = ScriptedBackend::always("stub", MockReply::json("Projects", 0.9));
    let (engine, storage) = with_storage(backend);
    for record in synthetic_history(100, 0.9, 0.6) {
        storage.append_feedback(&record).unwrap();
    }

    assert_eq!(engine.weight_version(), 0);
    let version = engine.recompute().unwrap();
    assert_eq!(version, 1);
    let weights = engine.current_weights();
    assert!(weights.global.generative > weights.global.semantic);

    assert_eq!(engine.recompute().unwrap(), 1);
    assert_eq!(storage.weight_version_count().unwrap(), 1);

    let metrics = engine.metrics().unwrap();
    assert_eq!(metrics.total_records, 100);
}

#[tokio::test]
async fn learned_weights_survive_restart() {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    for record in synthetic_history(50, 0.9, 0.2) {
        storage.append_feedback(&record).unwrap();
    }
    let backend = ScriptedBackend::always("stub", MockReply::json("Projects", 0.9));
    let first = build(backend.clone(), storage.clone(), storage.clone());
    first.recompute().unwrap();

    let second = build(backend, storage.clone(), storage);
    assert_eq!(second.current_weights(), first.current_weights());
}

#[tokio::test]
async fn imported_weights_reproduce_decisions() {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    for record in synthetic_history(100, 0.9, 0.3) {
        storage.append_feedback(&record).unwrap();
    }
    let backend = ScriptedBackend::always("stub", MockReply::json("Projects", 0.7));
    let source = build(backend.clone(), areas_index(), storage);
    source.recompute().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weights.json");
    source.export_weights(&path).unwrap();

    let target = build(
        backend,
        areas_index(),
        Arc::new(StorageEngine::open_in_memory().unwrap()),
    );
    assert_eq!(target.import_weights(&path).unwrap(), 1);
    // Importing the same file again changes nothing.
    assert_eq!(target.import_weights(&path).unwrap(), 1);

    let note = || vec![Note::new("n", "gym budget")];
    let a = source.classify(note(), None, PlanMode::Preview).await.unwrap();
    let b = target.classify(note(), None, PlanMode::Preview).await.unwrap();
    assert_eq!(a.entries[0].decision.category, b.entries[0].decision.category);
    assert!((a.entries[0].decision.confidence - b.entries[0].decision.confidence).abs() < 1e-12);
}

#[tokio::test]
async fn local_feedback_keeps_teaching_after_an_import() {
    let exporter_log = Arc::new(StorageEngine::open_in_memory().unwrap());
    for record in synthetic_history(100, 0.9, 0.3) {
        exporter_log.append_feedback(&record).unwrap();
    }
    let backend = ScriptedBackend::always("stub", MockReply::json("Projects", 0.7));
    let source = build(backend.clone(), areas_index(), exporter_log);
    source.recompute().unwrap();
    assert_eq!(source.current_weights().learned_through, 100);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weights.json");
    source.export_weights(&path).unwrap();

    let local_log = Arc::new(StorageEngine::open_in_memory().unwrap());
    let target = build(backend, areas_index(), local_log.clone());
    target.import_weights(&path).unwrap();
    let imported = target.current_weights();
    assert_eq!(imported.learned_through, 0);
    assert_eq!(imported.global, source.current_weights().global);

    for record in synthetic_history(50, 1.0, 0.0) {
        local_log.append_feedback(&record).unwrap();
    }
    let version = target.recompute().unwrap();
    assert_eq!(version, imported.version + 1);
    let learned = target.current_weights();
    assert!(learned.global.semantic < imported.global.semantic);
    assert_eq!(learned.learned_through, 50);
    assert_eq!(learned.sample_count, imported.sample_count + 50);
}

#[tokio::test]
async fn finetune_export_covers_applied_entries() {
    let backend = ScriptedBackend::always("stub", MockReply::json("Projects", 0.9));
    let (engine, _storage) = with_storage(backend);
    engine.classify(notes(3), None, PlanMode::Apply).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dataset.jsonl");
    assert_eq!(engine.export_finetune_dataset(&path).unwrap(), 3);
}

#[tokio::test]
async fn file_backed_engine_opens_relative_to_root() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ParaConfig::default();
    config.storage.db_path = Some("vault.db".to_string());
    config.engine.workers = 2;
    let backend = ScriptedBackend::always("stub", MockReply::json("Projects", 0.9));

    let engine = EngineBuilder::new(config)
        .with_root(dir.path())
        .with_backends(vec![backend as Arc<dyn GenerativeBackend>])
        .with_embedding_providers(keyword_embedder())
        .build()
        .unwrap();
    let plan = engine.classify(notes(8), None, PlanMode::Apply).await.unwrap();

    assert!(dir.path().join("vault.db").exists());
    assert_eq!(plan.summary().applied, 8);
    assert_eq!(engine.index_stats().unwrap().count(&Category::new("Projects")), 8);
    let report = engine.index_imbalance().unwrap();
    assert!(report.imbalanced);
}

#[tokio::test]
async fn invalid_config_fails_to_build() {
    let mut config = config();
    config.categories.labels.clear();
    assert!(EngineBuilder::new(config).build().is_err());
}
