//! Translation of caller filter terms into a structured search request.
//!
//! `distance`, `zip`, `page` and `per_page` are taken out of the terms first;
//! what remains becomes equality filters, combined with an optional
//! geo-distance filter around a fixed reference point.

use search_api_shared::types::filter_terms::{DISTANCE, PAGE, PER_PAGE, ZIP};
use search_api_shared::{FilterTerms, GeoPoint, StructuredQuery};
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::SearchApiError;
use crate::opensearch::LOCATION_FIELD;

/// Builds structured search requests from filter terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryTranslator {
    reference_point: GeoPoint,
}

impl Default for QueryTranslator {
    fn default() -> Self {
        Self::new(GeoPoint::SFO)
    }
}

impl QueryTranslator {
    /// Create a translator measuring distances from `reference_point`.
    pub fn new(reference_point: GeoPoint) -> Self {
        Self { reference_point }
    }

    /// Build the request for `terms` against a scoped `index`.
    ///
    /// `default_per_page` applies when the terms carry no `per_page`.
    ///
    /// # Errors
    ///
    /// `SearchApiError::InvalidPagination` if `page` or `per_page` is not a
    /// non-negative integer or a string holding one.
    pub fn translate(
        &self,
        mut terms: FilterTerms,
        index: impl Into<String>,
        default_per_page: u64,
    ) -> Result<StructuredQuery, SearchApiError> {
        let mut clauses = Vec::new();

        let distance = terms.remove(DISTANCE);
        if let Some(distance) = distance.as_ref().and_then(distance_spec) {
            clauses.push(self.geo_distance_clause(&distance));
            // The zip code only locates the caller; the geo filter replaces it
            terms.remove(ZIP);
        }

        let page = pagination_value(PAGE, terms.remove(PAGE), 0)?;
        let per_page = pagination_value(PER_PAGE, terms.remove(PER_PAGE), default_per_page)?;

        clauses.extend(
            terms
                .iter()
                .filter(|(_, value)| !is_empty_value(value))
                .map(|(field, value)| equality_clause(field, value)),
        );

        let query = if clauses.is_empty() {
            json!({ "match_all": {} })
        } else {
            json!({ "bool": { "filter": clauses } })
        };

        let request = StructuredQuery {
            index: index.into(),
            from: page,
            size: per_page,
            query,
        };

        debug!(
            index = %request.index,
            body = %request.body(),
            "Built search request"
        );
        Ok(request)
    }

    fn geo_distance_clause(&self, distance: &str) -> Value {
        json!({
            "geo_distance": {
                "distance": distance,
                LOCATION_FIELD: {
                    "lat": self.reference_point.lat,
                    "lon": self.reference_point.lon,
                }
            }
        })
    }
}

/// Radius specification from a `distance` term, if it is non-empty.
fn distance_spec(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn equality_clause(field: &str, value: &Value) -> Value {
    match value {
        Value::Array(_) => json!({ "terms": { field: value } }),
        _ => json!({ "term": { field: value } }),
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Interpret a pagination term: absent, null or blank means `default`.
fn pagination_value(key: &str, value: Option<Value>, default: u64) -> Result<u64, SearchApiError> {
    let invalid = |value: &Value| SearchApiError::invalid_pagination(key, value.to_string());

    match value {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Number(n)) => n.as_u64().ok_or_else(|| invalid(&Value::Number(n.clone()))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(default),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| invalid(&Value::String(s.clone()))),
        Some(other) => Err(invalid(&other)),
    }
}
