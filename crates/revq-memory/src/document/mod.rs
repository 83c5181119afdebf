pub mod chunker;
pub mod error;
pub mod loader;
pub mod money;
pub mod normalizer;
pub mod pipeline;
pub mod splitter;
pub mod types;

pub use chunker::derive_chunks;
pub use error::DocumentError;
pub use loader::PdfLoader;
pub use money::{CURRENCY_MARKER, ParseError, parse_revenue};
pub use normalizer::normalize;
pub use pipeline::IngestionPipeline;
pub use splitter::{SplitterConfig, TextSplitter};
pub use types::{Chunk, ChunkMetadata, Document, DocumentMetadata, Split};

/// Default maximum file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

pub trait DocumentLoader: Send + Sync {
    fn load(
        &self,
        path: &std::path::Path,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Vec<Document>, DocumentError>> + Send + '_>,
    >;

    fn supported_extensions(&self) -> &[&str];
}
