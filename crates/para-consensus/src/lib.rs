//! # para-consensus
//!
//! Combines the semantic and generative signals for one note into a
//! [`Decision`](para_core::Decision). The tunable state (source weights and
//! the confidence calibration curve) is an immutable, versioned
//! [`WeightVector`](para_core::WeightVector) handed out by the
//! [`WeightRegistry`].

pub mod registry;
pub mod resolver;

pub use registry::WeightRegistry;
pub use resolver::ConsensusResolver;
