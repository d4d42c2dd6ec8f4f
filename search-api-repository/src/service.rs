//! Search facade.
//!
//! This module provides the main entry point for searching. Application code
//! passes filter terms and index options; the service resolves the scoped
//! index, builds the request, runs it and reshapes the hits.

use std::sync::Arc;

use search_api_shared::{FilterTerms, SearchOptions, SearchResult};
use tracing::{debug, instrument};

use crate::config::ConfigStore;
use crate::errors::SearchApiError;
use crate::interfaces::SearchIndexProvider;
use crate::naming::IndexNameResolver;
use crate::query::QueryTranslator;
use crate::utils::parse_search_hits;

/// The main service for searching configured datasets.
///
/// Composes the configuration store, the index name resolver and the query
/// translator, and delegates execution to a `SearchIndexProvider`. Engine
/// errors are returned unchanged as `SearchApiError::SearchEngine`; there is
/// no retry.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use search_api_repository::{ConfigStore, IndexNameResolver, OpenSearchProvider, SearchService};
/// use search_api_shared::{FilterTerms, SearchOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = Arc::new(OpenSearchProvider::new("http://localhost:9200").await?);
/// let config = Arc::new(ConfigStore::new("./sample-data"));
/// let resolver = IndexNameResolver::new("development", Arc::clone(&config));
/// let service = SearchService::new(provider, config, resolver);
///
/// let terms: FilterTerms = [("name", "Yale")].into_iter().collect();
/// let result = service.search(terms, &SearchOptions::api("colleges")).await?;
/// println!("{} matches", result.total);
/// # Ok(())
/// # }
/// ```
pub struct SearchService {
    provider: Arc<dyn SearchIndexProvider>,
    config: Arc<ConfigStore>,
    resolver: IndexNameResolver,
    translator: QueryTranslator,
}

impl SearchService {
    /// Create a search service measuring distances from the default
    /// reference point.
    pub fn new(
        provider: Arc<dyn SearchIndexProvider>,
        config: Arc<ConfigStore>,
        resolver: IndexNameResolver,
    ) -> Self {
        Self::with_translator(provider, config, resolver, QueryTranslator::default())
    }

    /// Create a search service with a custom query translator.
    pub fn with_translator(
        provider: Arc<dyn SearchIndexProvider>,
        config: Arc<ConfigStore>,
        resolver: IndexNameResolver,
        translator: QueryTranslator,
    ) -> Self {
        Self {
            provider,
            config,
            resolver,
            translator,
        }
    }

    /// Search a dataset.
    ///
    /// # Arguments
    ///
    /// * `terms` - Equality filters plus the reserved `distance`, `zip`,
    ///   `page` and `per_page` keys
    /// * `options` - The API endpoint or logical index to search
    ///
    /// # Returns
    ///
    /// * `Ok(SearchResult)` - Total hit count, pagination and the source documents
    /// * `Err(SearchApiError::ConfigurationNotFound)` - If the API is not configured
    /// * `Err(SearchApiError::InvalidPagination)` - If `page`/`per_page` is not an integer
    /// * `Err(SearchApiError::SearchEngine)` - If the engine request fails
    #[instrument(skip(self, terms), fields(term_count = terms.len()))]
    pub async fn search(
        &self,
        terms: FilterTerms,
        options: &SearchOptions,
    ) -> Result<SearchResult, SearchApiError> {
        let config = self.config.load_if_needed().await?;
        let index = self.resolver.resolve_index_from_options(options).await?;
        let request = self.translator.translate(terms, index, config.page_size)?;

        let response = self.provider.search(&request).await?;
        let (total, results) = parse_search_hits(&response)?;

        let result = SearchResult {
            total,
            page: request.from,
            per_page: request.size,
            results,
        };
        debug!(
            index = %request.index,
            total = result.total,
            returned = result.len(),
            "Search completed"
        );
        Ok(result)
    }
}
