//! Query modules, one per table family.

pub mod feedback_ops;
pub mod vector_ops;
pub mod weight_ops;

use chrono::{DateTime, SecondsFormat, Utc};

use para_core::errors::ParaResult;

use crate::to_storage_err;

/// Timestamps are stored as RFC 3339 with nanoseconds so they round-trip exactly.
pub(crate) fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn parse_ts(s: &str) -> ParaResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("bad timestamp '{s}': {e}")))
}
