//! Chunk retrieval: plain similarity search or LLM-driven self-query.

use std::sync::Arc;

use revq_llm::provider::{LlmProvider, Message, Role};
use revq_memory::{
    Condition, FieldCondition, FieldValue, RangeCondition, ScoredVectorPoint, VectorFilter,
    VectorStore,
};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::error::SearchError;
use crate::prompt::self_query_prompt;

pub const TOP_K: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrieverKind {
    /// Embed the question as-is and take the nearest chunks.
    Similarity,
    /// Ask the LLM to rewrite the question and derive metadata filters
    /// before searching.
    SelfQuery,
}

/// Structured output of the self-query translation.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct StructuredQuery {
    /// Rewritten similarity query, stripped of filter phrasing.
    pub query: String,
    /// Metadata constraints implied by the question, if any.
    pub filter: Option<RevenueFilter>,
    /// Requested number of results, when the question asks for one.
    pub limit: Option<u64>,
}

/// Bounds over chunk metadata. Unset fields are unconstrained.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct RevenueFilter {
    pub min_revenue_gt: Option<f64>,
    pub min_revenue_lt: Option<f64>,
    pub max_revenue_gt: Option<f64>,
    pub max_revenue_lt: Option<f64>,
    pub file_name: Option<String>,
    pub creation_date: Option<String>,
}

impl RevenueFilter {
    fn into_vector_filter(self) -> Option<VectorFilter> {
        let mut must = Vec::new();

        let min_range = RangeCondition {
            field: "min_revenue".to_owned(),
            gt: self.min_revenue_gt,
            lt: self.min_revenue_lt,
            ..RangeCondition::default()
        };
        if min_range.gt.is_some() || min_range.lt.is_some() {
            must.push(Condition::Range(min_range));
        }

        let max_range = RangeCondition {
            field: "max_revenue".to_owned(),
            gt: self.max_revenue_gt,
            lt: self.max_revenue_lt,
            ..RangeCondition::default()
        };
        if max_range.gt.is_some() || max_range.lt.is_some() {
            must.push(Condition::Range(max_range));
        }

        if let Some(file_name) = self.file_name {
            must.push(Condition::Match(FieldCondition {
                field: "file_name".to_owned(),
                value: FieldValue::Text(file_name),
            }));
        }
        if let Some(creation_date) = self.creation_date {
            must.push(Condition::Match(FieldCondition {
                field: "creation_date".to_owned(),
                value: FieldValue::Text(creation_date),
            }));
        }

        if must.is_empty() {
            None
        } else {
            Some(VectorFilter { must })
        }
    }
}

pub struct Retriever<P: LlmProvider> {
    store: Arc<dyn VectorStore>,
    provider: Arc<P>,
    collection: String,
    kind: RetrieverKind,
}

impl<P: LlmProvider> Retriever<P> {
    pub fn new(
        store: Arc<dyn VectorStore>,
        provider: Arc<P>,
        collection: impl Into<String>,
        kind: RetrieverKind,
    ) -> Self {
        Self {
            store,
            provider,
            collection: collection.into(),
            kind,
        }
    }

    /// Retrieve the chunks most relevant to `question`.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding, self-query translation, or the vector
    /// search fails.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<ScoredVectorPoint>, SearchError> {
        let (query, filter, limit) = match self.kind {
            RetrieverKind::Similarity => (question.to_owned(), None, TOP_K),
            RetrieverKind::SelfQuery => {
                let structured = self.translate(question).await?;
                let query = if structured.query.trim().is_empty() {
                    question.to_owned()
                } else {
                    structured.query
                };
                let filter = structured.filter.and_then(RevenueFilter::into_vector_filter);
                (query, filter, structured.limit.unwrap_or(TOP_K))
            }
        };

        let vector = self.provider.embed(&query).await?;
        let points = self
            .store
            .search(&self.collection, vector, limit, filter)
            .await?;

        tracing::debug!(
            collection = %self.collection,
            kind = ?self.kind,
            retrieved = points.len(),
            "retrieved chunks"
        );
        Ok(points)
    }

    async fn translate(&self, question: &str) -> Result<StructuredQuery, SearchError> {
        let messages = [
            Message::new(Role::System, self_query_prompt()),
            Message::new(Role::User, question),
        ];
        Ok(self.provider.chat_typed(&messages).await?)
    }
}
