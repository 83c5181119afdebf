//! Question answering over ingested revenue chunks.
//!
//! Two retrieval modes feed a single retrieve-then-generate chain: plain
//! similarity over the question embedding, or self-query, where the LLM
//! first rewrites the question and derives metadata filters.

pub mod chain;
pub mod error;
pub mod prompt;
pub mod retriever;

pub use chain::{RetrievedChunk, SearchChain, SearchResponse};
pub use error::SearchError;
pub use prompt::REFUSAL;
pub use retriever::{Retriever, RetrieverKind, TOP_K};
