//! Feedback log queries. The log is append-only; nothing here updates or deletes.

use rusqlite::{params, Connection};

use para_core::errors::ParaResult;
use para_core::models::{Decision, FeedbackRecord, FeedbackSource};
use para_core::Category;

use super::{format_ts, parse_ts};
use crate::{sqlite_err, to_storage_err};

/// Append a record unless `(note_id, decided_at)` is already logged.
/// Returns the new sequence number, `None` for a duplicate.
pub fn append_feedback(conn: &Connection, record: &FeedbackRecord) -> ParaResult<Option<u64>> {
    let decision = &record.decision;
    let decision_json = serde_json::to_string(decision)?;
    let changed = conn
        .execute(
            "INSERT OR IGNORE INTO feedback_log
                (note_id, decided_at, decision_id, predicted, confirmed, source,
                 decision_json, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                decision.note_id,
                format_ts(&decision.decided_at),
                decision.id,
                decision.category.as_ref().map(Category::as_str),
                record.confirmed.as_ref().map(Category::as_str),
                record.source.as_str(),
                decision_json,
                format_ts(&record.recorded_at),
            ],
        )
        .map_err(sqlite_err)?;

    if changed == 0 {
        return Ok(None);
    }
    let seq = conn.last_insert_rowid();
    u64::try_from(seq)
        .map(Some)
        .map_err(|e| to_storage_err(e.to_string()))
}

/// The most recent `window` records, returned in ascending sequence order.
pub fn recent_feedback(conn: &Connection, window: usize) -> ParaResult<Vec<FeedbackRecord>> {
    let limit = i64::try_from(window).unwrap_or(i64::MAX);
    let mut stmt = conn
        .prepare(
            "SELECT seq, confirmed, source, decision_json, recorded_at FROM (
                SELECT seq, confirmed, source, decision_json, recorded_at
                FROM feedback_log ORDER BY seq DESC LIMIT ?1
             ) ORDER BY seq ASC",
        )
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map(params![limit], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .map_err(sqlite_err)?;

    let mut records = Vec::new();
    for row in rows {
        let (seq, confirmed, source, decision_json, recorded_at) = row.map_err(sqlite_err)?;
        let decision: Decision = serde_json::from_str(&decision_json)?;
        let source = FeedbackSource::parse(&source)
            .ok_or_else(|| to_storage_err(format!("unknown feedback source '{source}'")))?;
        records.push(FeedbackRecord {
            seq: seq.max(0) as u64,
            decision,
            confirmed: confirmed.map(Category::new),
            source,
            recorded_at: parse_ts(&recorded_at)?,
        });
    }
    Ok(records)
}

pub fn feedback_count(conn: &Connection) -> ParaResult<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM feedback_log", [], |row| row.get(0))
        .map_err(sqlite_err)?;
    Ok(count.max(0) as u64)
}
