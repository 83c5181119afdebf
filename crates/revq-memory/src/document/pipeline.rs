use std::collections::HashMap;
use std::sync::Arc;

use revq_llm::provider::EmbedFn;
use serde_json::json;
use uuid::Uuid;

use super::chunker::derive_chunks;
use super::normalizer::normalize;
use super::splitter::TextSplitter;
use super::types::Chunk;
use super::{Document, DocumentError, DocumentLoader};
use crate::vector_store::{VectorPoint, VectorStore};

/// Drives ingestion end to end: normalize pages, chunk, embed, then replace
/// the collection's contents.
///
/// Re-ingesting the same file is idempotent: the collection is deleted and
/// recreated before upserting, and nothing is written unless every chunk
/// embedded successfully.
pub struct IngestionPipeline {
    splitter: TextSplitter,
    store: Arc<dyn VectorStore>,
    collection: String,
    file_name: String,
    ingested_at: String,
    embed_fn: EmbedFn,
}

impl IngestionPipeline {
    pub fn new(
        splitter: TextSplitter,
        store: Arc<dyn VectorStore>,
        collection: impl Into<String>,
        file_name: impl Into<String>,
        embed_fn: EmbedFn,
    ) -> Self {
        Self {
            splitter,
            store,
            collection: collection.into(),
            file_name: file_name.into(),
            ingested_at: chrono::Utc::now().to_rfc3339(),
            embed_fn,
        }
    }

    /// Override the ingestion timestamp recorded in chunk metadata.
    #[must_use]
    pub fn with_ingested_at(mut self, ingested_at: impl Into<String>) -> Self {
        self.ingested_at = ingested_at.into();
        self
    }

    /// Ingest page documents: normalize -> chunk -> embed -> store. Returns
    /// the number of chunks written.
    ///
    /// # Errors
    ///
    /// Returns an error if normalization, chunk metadata derivation,
    /// embedding, or storage fails. Storage is only touched after every
    /// chunk has an embedding.
    pub async fn ingest(&self, documents: Vec<Document>) -> Result<usize, DocumentError> {
        let normalized = normalize(documents)?;
        let chunks = derive_chunks(&normalized, &self.splitter, &self.file_name, &self.ingested_at)?;
        if chunks.is_empty() {
            return Ok(0);
        }

        let mut points = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let vector = (self.embed_fn)(&chunk.content).await?;
            points.push(VectorPoint {
                id: Uuid::new_v4().to_string(),
                vector,
                payload: chunk_payload(chunk),
            });
        }

        let dim = points[0].vector.len() as u64;
        self.store.delete_collection(&self.collection).await?;
        self.store.ensure_collection(&self.collection, dim).await?;
        self.store.upsert(&self.collection, points).await?;

        tracing::info!(
            collection = %self.collection,
            chunks = chunks.len(),
            "ingested revenue document"
        );
        Ok(chunks.len())
    }

    /// # Errors
    ///
    /// Returns an error if loading, normalization, embedding, or storage
    /// fails.
    pub async fn load_and_ingest(
        &self,
        loader: &(dyn DocumentLoader + '_),
        path: &std::path::Path,
    ) -> Result<usize, DocumentError> {
        let documents = loader.load(path).await?;
        self.ingest(documents).await
    }
}

fn chunk_payload(chunk: &Chunk) -> HashMap<String, serde_json::Value> {
    HashMap::from([
        ("content".to_owned(), json!(chunk.content)),
        ("chunk_index".to_owned(), json!(chunk.chunk_index)),
        ("min_revenue".to_owned(), json!(chunk.metadata.min_revenue)),
        ("max_revenue".to_owned(), json!(chunk.metadata.max_revenue)),
        ("file_name".to_owned(), json!(chunk.metadata.file_name)),
        (
            "creation_date".to_owned(),
            json!(chunk.metadata.creation_date),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::pin::Pin;
    use std::sync::Mutex;

    use super::*;
    use crate::document::splitter::SplitterConfig;
    use crate::document::types::DocumentMetadata;
    use crate::vector_store::{ScoredVectorPoint, VectorFilter, VectorStoreError};

    fn page(content: &str) -> Document {
        Document {
            content: content.to_owned(),
            metadata: DocumentMetadata {
                source: "revenues.pdf".to_owned(),
                content_type: "application/pdf".to_owned(),
                extra: HashMap::new(),
            },
        }
    }

    fn noop_embed() -> EmbedFn {
        Box::new(|_text: &str| Box::pin(async move { Ok(vec![0.5f32; 4]) }))
    }

    fn error_embed() -> EmbedFn {
        Box::new(|_text: &str| {
            Box::pin(async move { Err(revq_llm::LlmError::Other("embed down".into())) })
        })
    }

    /// Records calls in order and keeps upserted points for inspection.
    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<String>>,
        points: Mutex<Vec<VectorPoint>>,
    }

    impl VectorStore for RecordingStore {
        fn ensure_collection(
            &self,
            collection: &str,
            _vector_size: u64,
        ) -> Pin<Box<dyn Future<Output = Result<(), VectorStoreError>> + Send + '_>> {
            self.calls.lock().unwrap().push(format!("ensure:{collection}"));
            Box::pin(async { Ok(()) })
        }

        fn collection_exists(
            &self,
            _collection: &str,
        ) -> Pin<Box<dyn Future<Output = Result<bool, VectorStoreError>> + Send + '_>> {
            Box::pin(async { Ok(true) })
        }

        fn delete_collection(
            &self,
            collection: &str,
        ) -> Pin<Box<dyn Future<Output = Result<(), VectorStoreError>> + Send + '_>> {
            self.calls.lock().unwrap().push(format!("delete:{collection}"));
            self.points.lock().unwrap().clear();
            Box::pin(async { Ok(()) })
        }

        fn upsert(
            &self,
            collection: &str,
            points: Vec<VectorPoint>,
        ) -> Pin<Box<dyn Future<Output = Result<(), VectorStoreError>> + Send + '_>> {
            self.calls.lock().unwrap().push(format!("upsert:{collection}"));
            self.points.lock().unwrap().extend(points);
            Box::pin(async { Ok(()) })
        }

        fn search(
            &self,
            _collection: &str,
            _vector: Vec<f32>,
            _limit: u64,
            _filter: Option<VectorFilter>,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<ScoredVectorPoint>, VectorStoreError>> + Send + '_>>
        {
            Box::pin(async { Ok(Vec::new()) })
        }
    }

    fn pipeline(store: Arc<RecordingStore>) -> IngestionPipeline {
        IngestionPipeline::new(
            TextSplitter::new(SplitterConfig::default()),
            store,
            "revenues",
            "revenues.pdf",
            noop_embed(),
        )
        .with_ingested_at("2024-01-01T00:00:00+00:00")
    }

    #[tokio::test]
    async fn ingest_writes_one_point_per_chunk() {
        let store = Arc::new(RecordingStore::default());
        let count = pipeline(Arc::clone(&store))
            .ingest(vec![page("Header\nA R$ 1.000,00\nB R$ 500,00")])
            .await
            .unwrap();

        assert_eq!(count, 1);
        let points = store.points.lock().unwrap();
        assert_eq!(points.len(), 1);
        // sorted content and derived bounds land in the payload
        assert_eq!(
            points[0].payload["content"],
            serde_json::json!("B R$ 500,00\nA R$ 1.000,00")
        );
        assert_eq!(points[0].payload["min_revenue"], serde_json::json!(500.0));
        assert_eq!(points[0].payload["max_revenue"], serde_json::json!(1000.0));
        assert_eq!(
            points[0].payload["file_name"],
            serde_json::json!("revenues.pdf")
        );
    }

    #[tokio::test]
    async fn collection_is_cleared_before_upsert() {
        let store = Arc::new(RecordingStore::default());
        pipeline(Arc::clone(&store))
            .ingest(vec![page("Header\nA R$ 1,00")])
            .await
            .unwrap();

        let calls = store.calls.lock().unwrap();
        assert_eq!(
            calls.as_slice(),
            ["delete:revenues", "ensure:revenues", "upsert:revenues"]
        );
    }

    #[tokio::test]
    async fn reingestion_is_idempotent() {
        let store = Arc::new(RecordingStore::default());
        let p = pipeline(Arc::clone(&store));
        let docs = vec![page("Header\nA R$ 1,00\nB R$ 2,00")];

        let first = p.ingest(docs.clone()).await.unwrap();
        let second = p.ingest(docs).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.points.lock().unwrap().len(), first);
    }

    #[tokio::test]
    async fn header_only_pages_store_nothing() {
        let store = Arc::new(RecordingStore::default());
        let count = pipeline(Arc::clone(&store))
            .ingest(vec![page("Header"), page("Header")])
            .await
            .unwrap();

        assert_eq!(count, 0);
        assert!(store.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_line_aborts_before_storage() {
        let store = Arc::new(RecordingStore::default());
        let err = pipeline(Arc::clone(&store))
            .ingest(vec![page("Header\nA R$ 1,00\nno revenue here")])
            .await
            .unwrap_err();

        assert!(matches!(err, DocumentError::MalformedLine(_)));
        assert!(store.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn embedding_failure_leaves_store_untouched() {
        let store = Arc::new(RecordingStore::default());
        let p = IngestionPipeline::new(
            TextSplitter::new(SplitterConfig::default()),
            Arc::clone(&store) as Arc<dyn VectorStore>,
            "revenues",
            "revenues.pdf",
            error_embed(),
        );

        let err = p.ingest(vec![page("Header\nA R$ 1,00")]).await.unwrap_err();
        assert!(matches!(err, DocumentError::Embedding(_)));
        assert!(store.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn point_ids_are_unique() {
        let store = Arc::new(RecordingStore::default());
        let content = format!("Header\n{}", "A R$ 1,00\n".repeat(200));
        pipeline(Arc::clone(&store))
            .ingest(vec![page(&content)])
            .await
            .unwrap();

        let points = store.points.lock().unwrap();
        assert!(points.len() > 1);
        let mut ids: Vec<_> = points.iter().map(|p| p.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), points.len());
    }
}
