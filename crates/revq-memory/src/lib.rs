//! Revenue document pipeline and vector storage.
//!
//! The [`document`] module owns the deterministic part of ingestion:
//! monetary parsing, normalization (header removal, validation, global
//! sort), chunking with metadata derivation, and the driver that hands
//! chunks to an embedding callback and a [`VectorStore`].

pub mod document;
#[cfg(feature = "mock")]
pub mod in_memory_store;
pub mod qdrant_ops;
pub mod vector_store;

#[cfg(feature = "mock")]
pub use in_memory_store::InMemoryVectorStore;
pub use qdrant_ops::QdrantOps;
pub use vector_store::{
    Condition, FieldCondition, FieldValue, RangeCondition, ScoredVectorPoint, VectorFilter,
    VectorPoint, VectorStore, VectorStoreError,
};
