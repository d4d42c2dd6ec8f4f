//! Search result types for the search API.
//!
//! This module defines the response structure returned from search operations.

use serde::{Deserialize, Serialize};

use super::record::IndexedRecord;

/// Complete search response with results and pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// Total number of matching documents.
    /// May be greater than the number of returned results due to pagination.
    pub total: u64,

    /// Page that was requested.
    pub page: u64,

    /// Page size that was requested.
    pub per_page: u64,

    /// Source documents of the returned hits, in engine order.
    pub results: Vec<IndexedRecord>,
}

impl SearchResult {
    /// Returns true if there are no results.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Returns the number of results in this response.
    pub fn len(&self) -> usize {
        self.results.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialization_shape() {
        let mut record = IndexedRecord::new();
        record.insert("name".to_string(), json!("Yale"));
        let result = SearchResult {
            total: 1,
            page: 0,
            per_page: 20,
            results: vec![record],
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "total": 1,
                "page": 0,
                "per_page": 20,
                "results": [{ "name": "Yale" }]
            })
        );
    }
}
