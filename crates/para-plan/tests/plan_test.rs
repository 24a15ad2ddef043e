//! Plan state machine and apply policy.

use chrono::Utc;

use para_core::errors::PlanError;
use para_core::{
    Category, Decision, DecisionOutcome, FeatureSummary, GenerativeResult, GenerativeSignal,
    SemanticSignal,
};
use para_plan::{ClassificationPlan, EntryState, PlanMode};

fn decision(note: &str, category: Option<&str>, confidence: f64, discrepancy: bool) -> Decision {
    Decision {
        id: format!("d-{note}"),
        note_id: note.to_string(),
        category: category.map(Category::new),
        confidence,
        semantic: SemanticSignal::unavailable("n/a"),
        generative: match category {
            Some(c) => GenerativeSignal::available(GenerativeResult::new(c, confidence)),
            None => GenerativeSignal::unavailable("n/a"),
        },
        discrepancy,
        outcome: if category.is_some() {
            DecisionOutcome::Consensus
        } else {
            DecisionOutcome::Undecidable
        },
        features: FeatureSummary::default(),
        weight_version: 2,
        decided_at: Utc::now(),
    }
}

fn plan(mode: PlanMode) -> ClassificationPlan {
    ClassificationPlan::new(
        mode,
        None,
        vec![
            decision("a", Some("Projects"), 0.9, false),
            decision("b", Some("Areas"), 0.4, true),
            decision("c", None, 0.0, false),
            decision("d", Some("Resources"), 0.2, false),
        ],
    )
}

#[test]
fn entries_keep_input_order_and_initial_states() {
    let p = plan(PlanMode::Apply);
    let notes: Vec<&str> = p.entries.iter().map(|e| e.note_id.as_str()).collect();
    assert_eq!(notes, vec!["a", "b", "c", "d"]);
    assert_eq!(p.entries[2].state, EntryState::Undecidable);
    assert_eq!(p.weight_version, 2);

    let s = p.summary();
    assert_eq!(s.total, 4);
    assert_eq!(s.proposed, 3);
    assert_eq!(s.undecidable, 1);
    assert_eq!(s.discrepancies, 1);
    assert_eq!(s.needs_review, 2);
}

#[test]
fn auto_apply_skips_discrepancies_undecidable_and_low_confidence() {
    let p = plan(PlanMode::Apply);
    let ids = p.auto_apply_candidates(0.3, true);
    assert_eq!(ids, vec![p.entries[0].id.clone()]);

    let ids = p.auto_apply_candidates(0.0, false);
    assert_eq!(ids.len(), 3);
    assert!(!ids.contains(&p.entries[2].id));
}

#[test]
fn preview_plans_refuse_transitions() {
    let mut p = plan(PlanMode::Preview);
    let id = p.entries[0].id.clone();
    assert!(matches!(
        p.mark_applied(&id, Category::new("Projects"), Some(1)),
        Err(PlanError::PreviewOnly { .. })
    ));
    assert!(p.auto_apply_candidates(0.0, false).is_empty());
}

#[test]
fn terminal_states_accept_nothing() {
    let mut p = plan(PlanMode::Apply);
    let id = p.entries[0].id.clone();
    p.mark_applied(&id, Category::new("Projects"), Some(7)).unwrap();
    assert_eq!(p.entries[0].feedback_seq, Some(7));
    assert_eq!(p.entries[0].applied_category, Some(Category::new("Projects")));

    assert!(matches!(
        p.mark_rejected(&id, None),
        Err(PlanError::InvalidTransition { .. })
    ));
    assert!(p.mark_applied(&id, Category::new("Areas"), None).is_err());
    assert_eq!(p.summary().applied, 1);
}

#[test]
fn undecidable_can_be_applied_manually() {
    let mut p = plan(PlanMode::Apply);
    let id = p.entries[2].id.clone();
    p.mark_applied(&id, Category::new("Archive"), Some(1)).unwrap();
    assert_eq!(p.entries[2].state, EntryState::Applied);
    assert_eq!(p.summary().needs_review, 1);
}

#[test]
fn unknown_entry_is_reported() {
    let mut p = plan(PlanMode::Apply);
    assert!(matches!(
        p.mark_rejected("nope", None),
        Err(PlanError::UnknownEntry { .. })
    ));
}
