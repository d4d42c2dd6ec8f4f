//! Structured query types handed to the search engine.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A geographic coordinate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl GeoPoint {
    /// San Francisco International Airport, the reference point for
    /// distance searches.
    pub const SFO: GeoPoint = GeoPoint {
        lat: 37.615223,
        lon: -122.389977,
    };

    /// Create a new point.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl Default for GeoPoint {
    fn default() -> Self {
        Self::SFO
    }
}

/// A fully built search request.
///
/// `index` is the scoped physical index name. `from` and `size` carry the
/// caller's pagination and `query` is the engine query clause.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructuredQuery {
    /// Scoped index the request targets.
    pub index: String,
    /// Pagination offset.
    pub from: u64,
    /// Maximum number of hits to return.
    pub size: u64,
    /// Query clause.
    pub query: Value,
}

impl StructuredQuery {
    /// The request body sent to the search endpoint.
    pub fn body(&self) -> Value {
        json!({
            "from": self.from,
            "size": self.size,
            "query": self.query,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_contains_pagination_and_query() {
        let query = StructuredQuery {
            index: "test-colleges".to_string(),
            from: 2,
            size: 20,
            query: json!({ "match_all": {} }),
        };

        let body = query.body();
        assert_eq!(body["from"], 2);
        assert_eq!(body["size"], 20);
        assert!(body["query"]["match_all"].is_object());
        assert!(body.get("index").is_none());
    }

    #[test]
    fn test_default_point_is_sfo() {
        assert_eq!(GeoPoint::default(), GeoPoint::new(37.615223, -122.389977));
    }
}
