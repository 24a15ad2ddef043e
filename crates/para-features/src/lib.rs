//! # para-features
//!
//! Derives a [`FeatureSummary`](para_core::FeatureSummary) from raw note
//! text and metadata. Pure and total: no I/O, no failure modes, the same
//! input always yields the same summary.

pub mod extractor;
pub mod frontmatter;
mod patterns;

pub use extractor::{extract, FeatureExtractor};
