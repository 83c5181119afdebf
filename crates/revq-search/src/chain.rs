//! Retrieve-then-generate: fetch relevant chunks, stuff them into the
//! grounded-answer prompt, and return the answer with its context.

use std::collections::HashMap;
use std::sync::Arc;

use revq_llm::provider::{LlmProvider, Message, Role};
use revq_memory::VectorStore;

use crate::error::SearchError;
use crate::prompt::answer_prompt;
use crate::retriever::{Retriever, RetrieverKind};

/// One retrieved chunk, as handed back to callers alongside the answer.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub content: String,
    pub payload: HashMap<String, serde_json::Value>,
    pub score: f32,
}

#[derive(Debug, Clone)]
pub struct SearchResponse {
    pub answer: String,
    pub context: Vec<RetrievedChunk>,
    pub question: String,
}

pub struct SearchChain<P: LlmProvider> {
    retriever: Retriever<P>,
    provider: Arc<P>,
}

impl<P: LlmProvider> SearchChain<P> {
    pub fn new(
        store: Arc<dyn VectorStore>,
        provider: Arc<P>,
        collection: impl Into<String>,
        kind: RetrieverKind,
    ) -> Self {
        let retriever = Retriever::new(store, Arc::clone(&provider), collection, kind);
        Self {
            retriever,
            provider,
        }
    }

    /// Answer `question` using only retrieved chunk content.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::EmptyQuestion`] for a blank question before
    /// any provider or store call, and propagates retrieval or generation
    /// failures.
    pub async fn ask(&self, question: &str) -> Result<SearchResponse, SearchError> {
        if question.trim().is_empty() {
            return Err(SearchError::EmptyQuestion);
        }

        let points = self.retriever.retrieve(question).await?;
        let context: Vec<RetrievedChunk> = points
            .into_iter()
            .filter_map(|p| {
                let Some(content) = p.payload.get("content").and_then(|v| v.as_str()) else {
                    tracing::warn!(id = %p.id, "retrieved point has no content payload, skipping");
                    return None;
                };
                Some(RetrievedChunk {
                    content: content.to_owned(),
                    payload: p.payload,
                    score: p.score,
                })
            })
            .collect();

        let stuffed = context
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = answer_prompt(&stuffed, question);
        let answer = self
            .provider
            .chat(&[Message::new(Role::User, prompt)])
            .await?;

        tracing::info!(
            chunks = context.len(),
            provider = self.provider.name(),
            "answered question"
        );
        Ok(SearchResponse {
            answer,
            context,
            question: question.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use revq_llm::mock::MockProvider;
    use revq_memory::{InMemoryVectorStore, VectorPoint};
    use serde_json::json;

    use super::*;

    async fn seeded_store() -> Arc<InMemoryVectorStore> {
        let store = Arc::new(InMemoryVectorStore::new());
        store.ensure_collection("revenues", 4).await.unwrap();
        store
            .upsert(
                "revenues",
                vec![VectorPoint {
                    id: "a".to_owned(),
                    vector: vec![0.1; 4],
                    payload: HashMap::from([
                        ("content".to_owned(), json!("B R$ 500,00\nA R$ 1.000,00")),
                        ("min_revenue".to_owned(), json!(500.0)),
                        ("max_revenue".to_owned(), json!(1000.0)),
                    ]),
                }],
            )
            .await
            .unwrap();
        store
    }

    fn provider(mock: MockProvider) -> Arc<MockProvider> {
        let mut mock = mock.with_embeddings();
        mock.embedding = vec![0.1; 4];
        Arc::new(mock)
    }

    #[tokio::test]
    async fn blank_question_fails_without_touching_collaborators() {
        let store = Arc::new(InMemoryVectorStore::new());
        let chain = SearchChain::new(
            store,
            Arc::new(MockProvider::unreachable()),
            "revenues",
            RetrieverKind::Similarity,
        );

        for question in ["", "   ", "\n\t"] {
            let err = chain.ask(question).await.unwrap_err();
            assert!(matches!(err, SearchError::EmptyQuestion));
        }
    }

    #[tokio::test]
    async fn answer_carries_context_and_question() {
        let store = seeded_store().await;
        let chain = SearchChain::new(
            store,
            provider(MockProvider::with_responses(vec!["A Empresa A".to_owned()])),
            "revenues",
            RetrieverKind::Similarity,
        );

        let response = chain.ask("qual o maior faturamento?").await.unwrap();
        assert_eq!(response.answer, "A Empresa A");
        assert_eq!(response.question, "qual o maior faturamento?");
        assert_eq!(response.context.len(), 1);
        assert!(response.context[0].content.contains("R$ 500,00"));
        assert_eq!(
            response.context[0].payload["max_revenue"],
            json!(1000.0)
        );
    }

    #[tokio::test]
    async fn point_without_content_payload_is_skipped() {
        let store = Arc::new(InMemoryVectorStore::new());
        store.ensure_collection("revenues", 4).await.unwrap();
        store
            .upsert(
                "revenues",
                vec![
                    VectorPoint {
                        id: "with-content".to_owned(),
                        vector: vec![0.1; 4],
                        payload: HashMap::from([
                            ("content".to_owned(), json!("A R$ 1,00")),
                            ("min_revenue".to_owned(), json!(1.0)),
                        ]),
                    },
                    VectorPoint {
                        id: "no-content".to_owned(),
                        vector: vec![0.1; 4],
                        payload: HashMap::from([("min_revenue".to_owned(), json!(2.0))]),
                    },
                ],
            )
            .await
            .unwrap();

        let chain = SearchChain::new(
            store,
            provider(MockProvider::default()),
            "revenues",
            RetrieverKind::Similarity,
        );

        let response = chain.ask("pergunta").await.unwrap();
        assert_eq!(response.context.len(), 1);
        assert_eq!(response.context[0].content, "A R$ 1,00");
    }

    #[tokio::test]
    async fn generation_failure_propagates() {
        let store = seeded_store().await;
        let chain = SearchChain::new(
            store,
            provider(MockProvider::failing()),
            "revenues",
            RetrieverKind::Similarity,
        );

        let err = chain.ask("pergunta").await.unwrap_err();
        assert!(matches!(err, SearchError::Llm(_)));
    }

    #[tokio::test]
    async fn empty_collection_still_answers() {
        let store = Arc::new(InMemoryVectorStore::new());
        store.ensure_collection("revenues", 4).await.unwrap();
        let chain = SearchChain::new(
            store,
            provider(MockProvider::with_responses(vec![
                crate::prompt::REFUSAL.to_owned(),
            ])),
            "revenues",
            RetrieverKind::Similarity,
        );

        let response = chain.ask("qualquer pergunta").await.unwrap();
        assert!(response.context.is_empty());
        assert_eq!(response.answer, crate::prompt::REFUSAL);
    }
}
