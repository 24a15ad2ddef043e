//! v003: weight_vectors, every published weight vector version.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS weight_vectors (
    version     INTEGER PRIMARY KEY,
    payload     TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
";
