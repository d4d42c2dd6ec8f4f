//! Utility functions for the search API repository.

use search_api_shared::IndexedRecord;
use serde_json::Value;

use crate::errors::SearchIndexError;

/// Extract the hit total and the source documents from a search response.
///
/// `hits.total` may be a plain number or an object carrying `value`,
/// depending on the engine version. Hits without a `_source` object are
/// skipped.
///
/// # Example
///
/// ```
/// use search_api_repository::parse_search_hits;
/// use serde_json::json;
///
/// let response = json!({
///     "hits": { "total": { "value": 1 }, "hits": [ { "_source": { "name": "Yale" } } ] }
/// });
/// let (total, results) = parse_search_hits(&response).expect("valid response");
/// assert_eq!(total, 1);
/// assert_eq!(results[0]["name"], "Yale");
/// ```
pub fn parse_search_hits(response: &Value) -> Result<(u64, Vec<IndexedRecord>), SearchIndexError> {
    let hits = response
        .get("hits")
        .ok_or_else(|| SearchIndexError::parse("Search response is missing 'hits'"))?;

    let total = match hits.get("total") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::Object(total)) => total.get("value").and_then(Value::as_u64),
        _ => None,
    }
    .ok_or_else(|| SearchIndexError::parse("Search response is missing 'hits.total'"))?;

    let results = hits
        .get("hits")
        .and_then(Value::as_array)
        .map(|hits| {
            hits.iter()
                .filter_map(|hit| hit.get("_source").and_then(Value::as_object))
                .cloned()
                .collect::<Vec<IndexedRecord>>()
        })
        .unwrap_or_default();

    Ok((total, results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_numeric_total() {
        let response = json!({
            "took": 2,
            "hits": {
                "total": 42,
                "hits": [
                    { "_id": "1", "_source": { "name": "Yale", "level": "4" } },
                    { "_id": "2", "_source": { "name": "Harvard" } }
                ]
            }
        });

        let (total, results) = parse_search_hits(&response).unwrap();
        assert_eq!(total, 42);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["name"], "Yale");
        assert!(!results[0].contains_key("_id"));
    }

    #[test]
    fn test_parse_object_total() {
        let response = json!({
            "hits": { "total": { "value": 7, "relation": "eq" }, "hits": [] }
        });
        let (total, results) = parse_search_hits(&response).unwrap();
        assert_eq!(total, 7);
        assert!(results.is_empty());
    }

    #[test]
    fn test_hits_without_source_are_skipped() {
        let response = json!({
            "hits": { "total": 2, "hits": [ { "_id": "1" }, { "_source": { "name": "Yale" } } ] }
        });
        let (_, results) = parse_search_hits(&response).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_missing_hits_is_parse_error() {
        assert!(matches!(
            parse_search_hits(&json!({ "error": "boom" })),
            Err(SearchIndexError::ParseError(_))
        ));
        assert!(matches!(
            parse_search_hits(&json!({ "hits": { "hits": [] } })),
            Err(SearchIndexError::ParseError(_))
        ));
    }
}
