//! Error types for the search API repository.
//!
//! `SearchIndexError` covers failures reported by the search engine backend;
//! `SearchApiError` is what the resolver, translator, lifecycle manager and
//! search facade return to their callers.

mod search_api_error;
mod search_index_error;

pub use search_api_error::SearchApiError;
pub use search_index_error::SearchIndexError;
