//! Errors returned by the search API core.

use thiserror::Error;

use super::SearchIndexError;

/// Errors from index resolution, query translation, ingestion and search.
#[derive(Debug, Clone, Error)]
pub enum SearchApiError {
    /// The requested API endpoint is not declared in the data configuration.
    #[error("no configuration found for '{api}', available endpoints: {available:?}")]
    ConfigurationNotFound {
        /// The API name that was requested.
        api: String,
        /// Every API name currently configured.
        available: Vec<String>,
    },

    /// The search engine rejected or failed a request.
    #[error(transparent)]
    SearchEngine(#[from] SearchIndexError),

    /// Source data could not be read or is malformed.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The data configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A pagination term is not a non-negative integer.
    #[error("Invalid value for '{key}': {value}")]
    InvalidPagination {
        /// `page` or `per_page`.
        key: String,
        /// The rejected value, rendered as JSON.
        value: String,
    },

    /// Neither an API endpoint nor an index was given.
    #[error("search options must name an api or an index")]
    NoIndexSelected,

    /// Credentials for a backing service could not be found.
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// The engine rejected some of the imported documents.
    #[error("Import incomplete: {failed} of {rows} rows were rejected")]
    ImportIncomplete {
        /// Rows read from the data files.
        rows: usize,
        /// Documents the engine rejected.
        failed: usize,
    },

    /// The background re-index task did not complete.
    #[error("Reindex task error: {0}")]
    ReindexTask(String),
}

impl SearchApiError {
    /// Create a configuration not found error.
    pub fn configuration_not_found(api: impl Into<String>, available: Vec<String>) -> Self {
        Self::ConfigurationNotFound {
            api: api.into(),
            available,
        }
    }

    /// Create an invalid data error.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an invalid pagination error.
    pub fn invalid_pagination(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidPagination {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a credentials error.
    pub fn credentials(msg: impl Into<String>) -> Self {
        Self::Credentials(msg.into())
    }

    /// Create an import incomplete error.
    pub fn import_incomplete(rows: usize, failed: usize) -> Self {
        Self::ImportIncomplete { rows, failed }
    }

    /// Create a reindex task error.
    pub fn reindex_task(msg: impl Into<String>) -> Self {
        Self::ReindexTask(msg.into())
    }
}
