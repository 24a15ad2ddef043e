//! Persistence tests: file-backed reopen, feedback dedup and ordering,
//! weight versioning, corrupt payload detection, vector upsert semantics.

use chrono::{DateTime, Duration, Utc};

use para_core::errors::{ConfigError, ParaError};
use para_core::models::{CategoryScore, CategoryVote};
use para_core::traits::{ILearningStorage, IVectorStore, VectorRecord};
use para_core::{
    Category, Decision, DecisionOutcome, FeatureSummary, FeedbackRecord, FeedbackSource,
    GenerativeResult, GenerativeSignal, SemanticSignal, SourceWeights, WeightVector,
};
use para_storage::migrations::LATEST_VERSION;
use para_storage::StorageEngine;

fn base_time() -> DateTime<Utc> {
    DateTime::<Utc>::default() + Duration::days(19_000)
}

fn make_decision(note_id: &str, offset_secs: i64) -> Decision {
    let mut votes = std::collections::BTreeMap::new();
    votes.insert(
        Category::new("Projects"),
        CategoryVote {
            score: 0.4,
            neighbors: 2,
        },
    );
    Decision {
        id: uuid::Uuid::new_v4().to_string(),
        note_id: note_id.to_string(),
        category: Some(Category::new("Projects")),
        confidence: 0.7,
        semantic: SemanticSignal::available(CategoryScore {
            votes,
            neighbors_considered: 5,
        }),
        generative: GenerativeSignal::available(GenerativeResult::new("Projects", 0.9)),
        discrepancy: false,
        outcome: DecisionOutcome::Consensus,
        features: FeatureSummary::default(),
        weight_version: 0,
        decided_at: base_time() + Duration::seconds(offset_secs),
    }
}

fn make_feedback(note_id: &str, offset_secs: i64) -> FeedbackRecord {
    FeedbackRecord {
        seq: 0,
        decision: make_decision(note_id, offset_secs),
        confirmed: Some(Category::new("Projects")),
        source: FeedbackSource::UserConfirmed,
        recorded_at: base_time() + Duration::seconds(offset_secs + 1),
    }
}

fn make_vector(note_id: &str, category: &str, embedding: Vec<f32>) -> VectorRecord {
    VectorRecord {
        note_id: note_id.to_string(),
        embedding,
        category: Category::new(category),
        content_hash: format!("hash-{note_id}"),
        metadata: serde_json::json!({ "source": "test" }),
        updated_at: base_time(),
    }
}

fn weights(version: u64, semantic: f64) -> WeightVector {
    WeightVector {
        version,
        global: SourceWeights::from_semantic(semantic),
        ..WeightVector::default()
    }
}

// ── Schema ────────────────────────────────────────────────────────────────

#[test]
fn migrations_reach_latest_version() {
    let engine = StorageEngine::open_in_memory().unwrap();
    assert_eq!(engine.schema_version().unwrap(), LATEST_VERSION);
    assert_eq!(engine.pool().reader_count(), 0);
}

#[test]
fn reopening_a_file_keeps_data_and_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("para.db");

    {
        let engine = StorageEngine::open(&path, 2).unwrap();
        engine.append_feedback(&make_feedback("n1", 0)).unwrap();
        engine
            .upsert_vector(&make_vector("n1", "Projects", vec![1.0, 0.0]))
            .unwrap();
        engine.save_weights(&weights(1, 0.4)).unwrap();
    }

    let engine = StorageEngine::open(&path, 2).unwrap();
    assert_eq!(engine.schema_version().unwrap(), LATEST_VERSION);
    assert_eq!(engine.feedback_count().unwrap(), 1);
    assert_eq!(engine.vector_count().unwrap(), 1);
    assert_eq!(engine.latest_weights().unwrap().unwrap().version, 1);
}

// ── Feedback log ──────────────────────────────────────────────────────────

#[test]
fn duplicate_feedback_is_ignored() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let record = make_feedback("dup", 0);

    let first = engine.append_feedback(&record).unwrap();
    let second = engine.append_feedback(&record).unwrap();

    assert!(first.is_some());
    assert_eq!(second, None);
    assert_eq!(engine.feedback_count().unwrap(), 1);
}

#[test]
fn same_note_with_new_decision_time_is_a_new_record() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let a = engine.append_feedback(&make_feedback("n", 0)).unwrap().unwrap();
    let b = engine.append_feedback(&make_feedback("n", 10)).unwrap().unwrap();
    assert!(b > a);
    assert_eq!(engine.feedback_count().unwrap(), 2);
}

#[test]
fn recent_feedback_returns_window_in_ascending_order() {
    let engine = StorageEngine::open_in_memory().unwrap();
    for i in 0..10 {
        engine
            .append_feedback(&make_feedback(&format!("n{i}"), i * 5))
            .unwrap();
    }

    let window = engine.recent_feedback(4).unwrap();
    let ids: Vec<&str> = window.iter().map(|r| r.decision.note_id.as_str()).collect();
    assert_eq!(ids, vec!["n6", "n7", "n8", "n9"]);
    assert!(window.windows(2).all(|w| w[0].seq < w[1].seq));
}

#[test]
fn feedback_round_trips_decision_payload() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let record = make_feedback("payload", 3);
    let seq = engine.append_feedback(&record).unwrap().unwrap();

    let stored = engine.recent_feedback(1).unwrap().remove(0);
    assert_eq!(stored.seq, seq);
    assert_eq!(stored.decision, record.decision);
    assert_eq!(stored.confirmed, record.confirmed);
    assert_eq!(stored.source, FeedbackSource::UserConfirmed);
    assert_eq!(stored.recorded_at, record.recorded_at);
}

#[test]
fn rejected_feedback_has_no_confirmed_category() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let mut record = make_feedback("rejected", 0);
    record.confirmed = None;
    record.source = FeedbackSource::Rejected;
    engine.append_feedback(&record).unwrap();

    let stored = engine.recent_feedback(10).unwrap().remove(0);
    assert_eq!(stored.confirmed, None);
    assert_eq!(stored.source, FeedbackSource::Rejected);
}

// ── Weight vectors ────────────────────────────────────────────────────────

#[test]
fn latest_weights_is_none_on_fresh_store() {
    let engine = StorageEngine::open_in_memory().unwrap();
    assert!(engine.latest_weights().unwrap().is_none());
}

#[test]
fn latest_weights_returns_highest_version() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine.save_weights(&weights(1, 0.4)).unwrap();
    engine.save_weights(&weights(3, 0.3)).unwrap();
    engine.save_weights(&weights(2, 0.6)).unwrap();

    let latest = engine.latest_weights().unwrap().unwrap();
    assert_eq!(latest.version, 3);
    assert_eq!(latest.global.semantic, 0.3);
    assert_eq!(engine.weight_version_count().unwrap(), 3);
}

#[test]
fn saved_versions_are_immutable() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine.save_weights(&weights(1, 0.4)).unwrap();
    engine.save_weights(&weights(1, 0.9)).unwrap();

    let latest = engine.latest_weights().unwrap().unwrap();
    assert_eq!(latest.global.semantic, 0.4);
    assert_eq!(engine.weight_version_count().unwrap(), 1);
}

#[test]
fn corrupt_weight_payload_is_reported() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .pool()
        .writer
        .with_conn(|conn| {
            conn.execute(
                "INSERT INTO weight_vectors (version, payload) VALUES (7, '{not json')",
                [],
            )
            .map_err(|e| ParaError::Storage(para_core::errors::StorageError::Sqlite {
                message: e.to_string(),
            }))?;
            Ok(())
        })
        .unwrap();

    match engine.latest_weights() {
        Err(ParaError::Config(ConfigError::CorruptWeights { location, .. })) => {
            assert!(location.contains('7'));
        }
        other => panic!("expected CorruptWeights, got {other:?}"),
    }
}

// ── Note vectors ──────────────────────────────────────────────────────────

#[test]
fn upsert_replaces_existing_vector() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .upsert_vector(&make_vector("n1", "Projects", vec![1.0, 0.0]))
        .unwrap();
    engine
        .upsert_vector(&make_vector("n1", "Areas", vec![0.0, 1.0]))
        .unwrap();

    assert_eq!(engine.vector_count().unwrap(), 1);
    let stored = engine.get_vector("n1").unwrap().unwrap();
    assert_eq!(stored.category, Category::new("Areas"));
    assert_eq!(stored.embedding, vec![0.0, 1.0]);
    assert_eq!(stored.metadata["source"], "test");
}

#[test]
fn nearest_orders_by_similarity_and_skips_other_dimensions() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .upsert_vector(&make_vector("close", "Projects", vec![1.0, 0.1]))
        .unwrap();
    engine
        .upsert_vector(&make_vector("far", "Areas", vec![0.2, 1.0]))
        .unwrap();
    engine
        .upsert_vector(&make_vector("opposite", "Archive", vec![-1.0, 0.0]))
        .unwrap();
    engine
        .upsert_vector(&make_vector("wide", "Resources", vec![1.0, 0.0, 0.0]))
        .unwrap();

    let hits = engine.nearest(&[1.0, 0.0], 10).unwrap();
    let ids: Vec<&str> = hits.iter().map(|n| n.note_id.as_str()).collect();
    assert_eq!(ids, vec!["close", "far"]);
    assert!(hits[0].similarity > hits[1].similarity);

    let top = engine.nearest(&[1.0, 0.0], 1).unwrap();
    assert_eq!(top.len(), 1);
}

#[test]
fn zero_query_vector_has_no_neighbors() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .upsert_vector(&make_vector("n1", "Projects", vec![1.0, 0.0]))
        .unwrap();
    assert!(engine.nearest(&[0.0, 0.0], 5).unwrap().is_empty());
}

#[test]
fn counts_group_by_category() {
    let engine = StorageEngine::open_in_memory().unwrap();
    for (id, cat) in [("a", "Projects"), ("b", "Projects"), ("c", "Areas")] {
        engine
            .upsert_vector(&make_vector(id, cat, vec![1.0, 1.0]))
            .unwrap();
    }
    let counts = engine.count_by_category().unwrap();
    assert_eq!(counts[&Category::new("Projects")], 2);
    assert_eq!(counts[&Category::new("Areas")], 1);
    assert!(!counts.contains_key(&Category::new("Archive")));
}

#[test]
fn file_backed_reads_see_committed_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reads.db");
    let engine = StorageEngine::open(&path, 3).unwrap();
    assert_eq!(engine.pool().reader_count(), 3);
    assert_eq!(engine.pool().db_path(), Some(path.as_path()));
    engine
        .upsert_vector(&make_vector("n1", "Projects", vec![1.0, 0.0]))
        .unwrap();
    for _ in 0..3 {
        assert_eq!(engine.nearest(&[1.0, 0.0], 3).unwrap().len(), 1);
    }
}
