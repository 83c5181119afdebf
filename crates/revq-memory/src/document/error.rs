use super::money::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file too large: {0} bytes")]
    FileTooLarge(u64),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("line without a monetary value is not allowed: {0:?}")]
    MalformedLine(String),

    #[error("no documents to normalize")]
    EmptyInput,

    #[error("metadata derivation failed for chunk {chunk_index}")]
    MetadataDerivation {
        chunk_index: usize,
        #[source]
        source: ParseError,
    },

    #[error("chunk {chunk_index} contains no monetary values")]
    EmptyChunk { chunk_index: usize },

    #[error("embedding failed: {0}")]
    Embedding(#[from] revq_llm::LlmError),

    #[error("storage error: {0}")]
    Storage(#[from] crate::vector_store::VectorStoreError),
}
