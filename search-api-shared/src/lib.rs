//! # Search API Shared
//!
//! This crate defines the data structures shared between the search API
//! repository and the applications that consume it: caller filter terms,
//! index selection options, the structured query handed to the search engine,
//! and the reshaped search result.

pub mod types;

pub use types::filter_terms::FilterTerms;
pub use types::record::{IndexedRecord, RawRecord};
pub use types::search_options::SearchOptions;
pub use types::search_query::{GeoPoint, StructuredQuery};
pub use types::search_result::SearchResult;
