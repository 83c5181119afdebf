#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("question cannot be empty")]
    EmptyQuestion,

    #[error("LLM error: {0}")]
    Llm(#[from] revq_llm::LlmError),

    #[error("vector store error: {0}")]
    Store(#[from] revq_memory::VectorStoreError),
}
