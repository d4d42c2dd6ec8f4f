//! This module defines the core data structures used across the search API.
//! It re-exports the request, query and result types.

pub mod filter_terms;
pub mod record;
pub mod search_options;
pub mod search_query;
pub mod search_result;

pub use filter_terms::FilterTerms;
pub use record::{IndexedRecord, RawRecord};
pub use search_options::SearchOptions;
pub use search_query::{GeoPoint, StructuredQuery};
pub use search_result::SearchResult;
