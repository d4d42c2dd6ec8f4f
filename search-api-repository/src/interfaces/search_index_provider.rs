//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search engine operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use search_api_shared::{IndexedRecord, StructuredQuery};
use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::types::BatchOperationSummary;

/// Abstracts the underlying search engine (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are shared by the search facade, the index lifecycle
/// manager and the importer through a single `Arc<dyn SearchIndexProvider>`
/// created at bootstrap, so they must be safe for concurrent use.
///
/// All methods return `Result<T, SearchIndexError>` for consistent error handling across
/// different backend implementations.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Execute a search request and return the raw engine response.
    ///
    /// The response is expected to carry `hits.total` and `hits.hits[]._source`.
    ///
    /// # Arguments
    ///
    /// * `request` - The structured request, including its scoped index
    async fn search(&self, request: &StructuredQuery) -> Result<Value, SearchIndexError>;

    /// Returns true if the index exists.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError>;

    /// Create an index with the given settings and mappings body.
    async fn create_index(&self, index: &str, body: &Value) -> Result<(), SearchIndexError>;

    /// Delete an index.
    ///
    /// If the index doesn't exist, the operation is considered successful.
    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Clear the engine's query cache for all indices.
    async fn clear_cache(&self) -> Result<(), SearchIndexError>;

    /// Index multiple documents in one request and return a summary of
    /// successful and failed operations.
    ///
    /// # Arguments
    ///
    /// * `index` - Scoped index receiving the documents
    /// * `documents` - Documents keyed by indexed field names
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Contains aggregate statistics and individual results
    /// * `Err(SearchIndexError)` - If the bulk request fails entirely
    async fn bulk_index_documents(
        &self,
        index: &str,
        documents: &[IndexedRecord],
    ) -> Result<BatchOperationSummary, SearchIndexError>;
}
