//! v002: feedback_log, append-only (decision, ground truth) pairs.
//!
//! `(note_id, decided_at)` is the idempotency key for `record`.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS feedback_log (
    seq            INTEGER PRIMARY KEY AUTOINCREMENT,
    note_id        TEXT NOT NULL,
    decided_at     TEXT NOT NULL,
    decision_id    TEXT NOT NULL,
    predicted      TEXT,
    confirmed      TEXT,
    source         TEXT NOT NULL,
    decision_json  TEXT NOT NULL,
    recorded_at    TEXT NOT NULL,
    UNIQUE (note_id, decided_at)
);

CREATE INDEX IF NOT EXISTS idx_feedback_note ON feedback_log(note_id);
CREATE INDEX IF NOT EXISTS idx_feedback_recorded ON feedback_log(recorded_at);
";
