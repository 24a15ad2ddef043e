//! v001: note_vectors, one labelled embedding per note.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS note_vectors (
    note_id       TEXT PRIMARY KEY,
    category      TEXT NOT NULL,
    embedding     BLOB NOT NULL,
    dimensions    INTEGER NOT NULL,
    content_hash  TEXT NOT NULL,
    metadata      TEXT NOT NULL DEFAULT '{}',
    updated_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_note_vectors_category ON note_vectors(category);
";
