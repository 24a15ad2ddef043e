//! Seams between the engine and its collaborators.

pub mod cancellation;
pub mod embedding;
pub mod learning_storage;
pub mod vector_store;

pub use cancellation::{Cancellable, CancellationToken};
pub use embedding::IEmbeddingProvider;
pub use learning_storage::ILearningStorage;
pub use vector_store::{IVectorStore, Neighbor, VectorRecord};
