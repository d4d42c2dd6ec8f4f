//! # Search API Repository
//!
//! This crate holds everything between a search call and the search engine:
//! data configuration, environment-scoped index naming, field mapping at
//! ingestion, query translation, index lifecycle management and the search
//! facade. The engine itself sits behind [`SearchIndexProvider`], with a
//! concrete implementation for OpenSearch.

pub mod config;
pub mod errors;
pub mod field_mapper;
pub mod importer;
pub mod interfaces;
pub mod lifecycle;
pub mod naming;
pub mod opensearch;
pub mod query;
pub mod service;
pub mod types;
pub mod utils;

pub use config::{ApiConfig, ConfigStore, DataConfig, DataFile};
pub use errors::{SearchApiError, SearchIndexError};
pub use field_mapper::{map_field_names, nest_fields, FieldMapping};
pub use importer::{read_csv_records, ImportConfig, Importer};
pub use interfaces::SearchIndexProvider;
pub use lifecycle::{IndexLifecycle, ReindexHandle};
pub use naming::IndexNameResolver;
pub use opensearch::OpenSearchProvider;
pub use query::QueryTranslator;
pub use service::SearchService;
pub use types::{BatchOperationResult, BatchOperationSummary, ImportSummary};
pub use utils::parse_search_hits;
