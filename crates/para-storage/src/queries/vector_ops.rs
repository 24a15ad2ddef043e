//! Note vector queries: upsert, brute-force similarity scan, per-category counts.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rusqlite::{params, Connection, OptionalExtension};

use para_core::errors::ParaResult;
use para_core::traits::{Neighbor, VectorRecord};
use para_core::Category;

use super::{format_ts, parse_ts};
use crate::{sqlite_err, to_storage_err};

/// Insert or replace the vector for a note. Last writer wins.
pub fn upsert_vector(conn: &Connection, record: &VectorRecord) -> ParaResult<()> {
    let blob = f32_vec_to_bytes(&record.embedding);
    let metadata = serde_json::to_string(&record.metadata)?;
    conn.execute(
        "INSERT INTO note_vectors
            (note_id, category, embedding, dimensions, content_hash, metadata, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(note_id) DO UPDATE SET
            category = excluded.category,
            embedding = excluded.embedding,
            dimensions = excluded.dimensions,
            content_hash = excluded.content_hash,
            metadata = excluded.metadata,
            updated_at = excluded.updated_at",
        params![
            record.note_id,
            record.category.as_str(),
            blob,
            record.embedding.len() as i64,
            record.content_hash,
            metadata,
            format_ts(&record.updated_at),
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn get_vector(conn: &Connection, note_id: &str) -> ParaResult<Option<VectorRecord>> {
    let row = conn
        .query_row(
            "SELECT note_id, category, embedding, dimensions, content_hash, metadata, updated_at
             FROM note_vectors WHERE note_id = ?1",
            params![note_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Vec<u8>>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                ))
            },
        )
        .optional()
        .map_err(sqlite_err)?;

    let Some((note_id, category, blob, dims, content_hash, metadata, updated_at)) = row else {
        return Ok(None);
    };
    Ok(Some(VectorRecord {
        note_id,
        embedding: bytes_to_f32_vec(&blob, dims as usize),
        category: Category::new(category),
        content_hash,
        metadata: serde_json::from_str(&metadata)?,
        updated_at: parse_ts(&updated_at)?,
    }))
}

/// The `limit` stored notes most similar to `query`, most similar first.
///
/// Brute-force cosine scan in Rust. Rows with a different dimensionality
/// and non-positive similarities are skipped. Equal similarities order by
/// note id so results are deterministic.
pub fn nearest(conn: &Connection, query: &[f32], limit: usize) -> ParaResult<Vec<Neighbor>> {
    let query_norm_sq: f64 = query.iter().map(|x| (*x as f64) * (*x as f64)).sum();
    if query_norm_sq == 0.0 || limit == 0 {
        return Ok(vec![]);
    }

    let mut stmt = conn
        .prepare("SELECT note_id, category, embedding, dimensions FROM note_vectors")
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Vec<u8>>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })
        .map_err(sqlite_err)?;

    let mut scored: Vec<Neighbor> = Vec::new();
    for row in rows {
        let (note_id, category, blob, dims) = row.map_err(sqlite_err)?;
        if dims as usize != query.len() {
            continue;
        }
        let stored = bytes_to_f32_vec(&blob, dims as usize);
        let similarity = cosine_similarity(query, &stored);
        if similarity > 0.0 {
            scored.push(Neighbor {
                note_id,
                category: Category::new(category),
                similarity,
            });
        }
    }

    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.note_id.cmp(&b.note_id))
    });
    scored.truncate(limit);
    Ok(scored)
}

pub fn count_by_category(conn: &Connection) -> ParaResult<BTreeMap<Category, u64>> {
    let mut stmt = conn
        .prepare("SELECT category, COUNT(*) FROM note_vectors GROUP BY category")
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })
        .map_err(sqlite_err)?;

    let mut counts = BTreeMap::new();
    for row in rows {
        let (category, count) = row.map_err(sqlite_err)?;
        counts.insert(Category::new(category), count.max(0) as u64);
    }
    Ok(counts)
}

pub fn count_vectors(conn: &Connection) -> ParaResult<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM note_vectors", [], |row| row.get(0))
        .map_err(sqlite_err)?;
    u64::try_from(count).map_err(|e| to_storage_err(e.to_string()))
}

/// Convert an f32 slice to little-endian bytes.
fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert little-endian bytes back to an f32 vec.
fn bytes_to_f32_vec(bytes: &[u8], expected_dims: usize) -> Vec<f32> {
    let mut result = Vec::with_capacity(expected_dims);
    for chunk in bytes.chunks_exact(4) {
        result.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    result
}

/// Cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
