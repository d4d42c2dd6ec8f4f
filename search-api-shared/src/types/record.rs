//! Record types flowing through ingestion and search.

use serde_json::{Map, Value};

/// A row as read from a data source, keyed by external field names.
pub type RawRecord = Map<String, Value>;

/// A document as stored in the search index, keyed by indexed field names.
pub type IndexedRecord = Map<String, Value>;
