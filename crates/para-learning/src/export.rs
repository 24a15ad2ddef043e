//! File exports: weight vectors and the fine-tune dataset.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use para_core::errors::{LearningError, ParaResult};
use para_core::{FeedbackRecord, WeightVector};

/// Write `weights` as pretty JSON.
pub fn export_weights(weights: &WeightVector, path: &Path) -> ParaResult<()> {
    let json = serde_json::to_string_pretty(weights)?;
    std::fs::write(path, json).map_err(|e| export_failed(path, e))?;
    Ok(())
}

/// Read and validate a weight vector file.
///
/// The result carries the exporter's `learned_through`; rebase it with
/// `FeedbackStore::adopt_imported` before learning on top of it.
pub fn import_weights(path: &Path) -> ParaResult<WeightVector> {
    let text = std::fs::read_to_string(path).map_err(|e| LearningError::ImportFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let weights: WeightVector =
        serde_json::from_str(&text).map_err(|e| LearningError::ImportFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    weights.validate().map_err(|reason| LearningError::ImportFailed {
        path: path.display().to_string(),
        reason,
    })?;
    Ok(weights)
}

#[derive(Serialize)]
struct FinetuneInput<'a> {
    note_id: &'a str,
    features: &'a para_core::FeatureSummary,
    predicted: Option<&'a str>,
    confidence: f64,
    semantic: &'a para_core::SemanticSignal,
    generative: &'a para_core::GenerativeSignal,
}

#[derive(Serialize)]
struct FinetuneFeedback<'a> {
    confirmed: Option<&'a str>,
    source: &'a str,
    recorded_at: String,
}

#[derive(Serialize)]
struct FinetuneLine<'a> {
    input: FinetuneInput<'a>,
    feedback: FinetuneFeedback<'a>,
}

/// Write one JSON line per record. Returns the number of lines written.
pub fn export_finetune_dataset(records: &[FeedbackRecord], path: &Path) -> ParaResult<usize> {
    let file = File::create(path).map_err(|e| export_failed(path, e))?;
    let mut out = BufWriter::new(file);
    for r in records {
        let d = &r.decision;
        let line = FinetuneLine {
            input: FinetuneInput {
                note_id: &d.note_id,
                features: &d.features,
                predicted: d.category.as_ref().map(|c| c.as_str()),
                confidence: d.confidence,
                semantic: &d.semantic,
                generative: &d.generative,
            },
            feedback: FinetuneFeedback {
                confirmed: r.confirmed.as_ref().map(|c| c.as_str()),
                source: r.source.as_str(),
                recorded_at: r.recorded_at.to_rfc3339(),
            },
        };
        serde_json::to_writer(&mut out, &line)?;
        out.write_all(b"\n").map_err(|e| export_failed(path, e))?;
    }
    out.flush().map_err(|e| export_failed(path, e))?;
    Ok(records.len())
}

fn export_failed(path: &Path, e: std::io::Error) -> LearningError {
    LearningError::ExportFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}
