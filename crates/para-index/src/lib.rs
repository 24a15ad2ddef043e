//! # para-index
//!
//! Client over the semantic index. Queries return a similarity-weighted
//! vote per category from the k nearest labelled notes; upserts feed
//! confirmed notes back into the index.

pub mod aggregate;
pub mod client;
pub mod stats;

pub use aggregate::aggregate;
pub use client::SemanticIndexClient;
pub use stats::{ImbalanceReport, IndexStats};
