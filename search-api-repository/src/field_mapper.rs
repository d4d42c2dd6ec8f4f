//! Field name mapping for ingestion.
//!
//! Raw rows arrive keyed by the column names of the source data. The data
//! configuration declares which of those columns are indexed and under what
//! name; everything else is dropped.

use std::collections::BTreeMap;

use search_api_shared::{IndexedRecord, RawRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::{debug, trace};

/// Indexed field names containing this marker hold coordinates and are
/// stored as floats.
pub const LOCATION_MARKER: &str = "location";

/// Declared translation from external field names to indexed field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping {
    names: BTreeMap<String, String>,
}

impl FieldMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `external` is indexed as `internal`.
    pub fn insert(&mut self, external: impl Into<String>, internal: impl Into<String>) {
        self.names.insert(external.into(), internal.into());
    }

    /// Look up the indexed name for an external field.
    ///
    /// An exact match wins; otherwise the first entry equal ignoring ASCII
    /// case is used.
    pub fn lookup(&self, external: &str) -> Option<&str> {
        self.names
            .get(external)
            .or_else(|| {
                self.names
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(external))
                    .map(|(_, internal)| internal)
            })
            .map(String::as_str)
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over `(external, internal)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for FieldMapping
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (external, internal) in iter {
            mapping.insert(external, internal);
        }
        mapping
    }
}

/// Map a raw row to an indexable record.
///
/// Returns a record containing only the fields declared in `mapping`, keyed
/// by their indexed names. Values whose indexed name contains `"location"`
/// are converted to floats so they can back a `geo_point`.
///
/// # Example
///
/// ```
/// use search_api_repository::field_mapper::{map_field_names, FieldMapping};
/// use search_api_shared::RawRecord;
/// use serde_json::json;
///
/// let mapping: FieldMapping = [("INSTNM", "name"), ("LAT", "location.lat")].into_iter().collect();
/// let mut row = RawRecord::new();
/// row.insert("INSTNM".to_string(), json!("Yale"));
/// row.insert("LAT".to_string(), json!("41.31"));
/// row.insert("ZIP".to_string(), json!("06520"));
///
/// let mapped = map_field_names(&row, &mapping);
/// assert_eq!(mapped["name"], json!("Yale"));
/// assert_eq!(mapped["location.lat"], json!(41.31));
/// assert!(!mapped.contains_key("ZIP"));
/// ```
pub fn map_field_names(row: &RawRecord, mapping: &FieldMapping) -> IndexedRecord {
    let mut mapped = IndexedRecord::new();
    for (key, value) in row {
        let Some(new_key) = mapping.lookup(key) else {
            trace!(field = %key, "Dropping unmapped field");
            continue;
        };

        let value = if new_key.contains(LOCATION_MARKER) {
            coerce_to_float(value)
        } else {
            value.clone()
        };
        mapped.insert(new_key.to_string(), value);
    }
    mapped
}

/// Expand dotted field names into nested objects.
///
/// `{"location.lat": 1.0, "location.lon": 2.0}` becomes
/// `{"location": {"lat": 1.0, "lon": 2.0}}`, the shape the engine expects
/// for object and `geo_point` fields. A dotted name whose prefix already
/// holds a non-object value is kept flat.
///
/// # Example
///
/// ```
/// use search_api_repository::field_mapper::nest_fields;
/// use search_api_shared::IndexedRecord;
/// use serde_json::json;
///
/// let mut record = IndexedRecord::new();
/// record.insert("location.lat".to_string(), json!(41.31));
/// record.insert("name".to_string(), json!("Yale"));
///
/// let nested = nest_fields(record);
/// assert_eq!(nested["location"]["lat"], json!(41.31));
/// assert_eq!(nested["name"], json!("Yale"));
/// ```
pub fn nest_fields(record: IndexedRecord) -> IndexedRecord {
    let mut nested = IndexedRecord::new();
    for (key, value) in record {
        insert_path(&mut nested, &key, value);
    }
    nested
}

fn insert_path(target: &mut Map<String, Value>, path: &str, value: Value) {
    let Some((head, rest)) = path.split_once('.') else {
        target.insert(path.to_string(), value);
        return;
    };

    if target.get(head).is_some_and(|existing| !existing.is_object()) {
        debug!(field = %path, "Prefix holds a value, keeping dotted field flat");
        target.insert(path.to_string(), value);
        return;
    }

    if let Value::Object(child) = target
        .entry(head.to_string())
        .or_insert_with(|| Value::Object(Map::new()))
    {
        insert_path(child, rest, value);
    }
}

/// Convert a value to a JSON float, falling back to `0.0` for anything that
/// does not parse as a finite number.
fn coerce_to_float(value: &Value) -> Value {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    let number = parsed.and_then(Number::from_f64).unwrap_or_else(|| {
        debug!(value = %value, "Coordinate is not numeric, storing 0.0");
        Number::from_f64(0.0).unwrap_or_else(|| Number::from(0))
    });
    Value::Number(number)
}
