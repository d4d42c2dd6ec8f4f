//! Filter terms supplied by search callers.
//!
//! Callers pass an arbitrary mapping of field name to value. A handful of keys
//! are reserved and carry pagination or geo-distance parameters instead of
//! equality filters. Keys are canonicalised once on the way in so that lookups
//! never have to consider alternate spellings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Radius for the geo-distance filter (e.g. `"50mi"`).
pub const DISTANCE: &str = "distance";
/// Postal code; implied by the geo-distance filter and never used as a term.
pub const ZIP: &str = "zip";
/// Page requested by the caller.
pub const PAGE: &str = "page";
/// Page size requested by the caller.
pub const PER_PAGE: &str = "per_page";

/// Keys that are extracted before the remaining terms become equality filters.
pub const RESERVED_KEYS: [&str; 4] = [DISTANCE, ZIP, PAGE, PER_PAGE];

/// Mapping from field name to filter value.
///
/// Reserved keys are matched ASCII-case-insensitively and stored in their
/// lowercase form; every other key is kept exactly as given. Inserting a key
/// that canonicalises to an existing one replaces the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Value>",
    into = "BTreeMap<String, Value>"
)]
pub struct FilterTerms {
    terms: BTreeMap<String, Value>,
}

impl FilterTerms {
    /// Create an empty set of terms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a term, returning the value previously stored under the same
    /// canonical key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.terms.insert(canonical_key(key.into()), value.into())
    }

    /// Get the value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.terms.get(&canonical_key(key.to_string()))
    }

    /// Remove a key and return its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.terms.remove(&canonical_key(key.to_string()))
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns true if there are no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Iterate over the terms in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.terms.iter()
    }
}

fn canonical_key(key: String) -> String {
    RESERVED_KEYS
        .iter()
        .find(|reserved| reserved.eq_ignore_ascii_case(&key))
        .map(|reserved| reserved.to_string())
        .unwrap_or(key)
}

impl<K, V> FromIterator<(K, V)> for FilterTerms
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut terms = Self::new();
        for (key, value) in iter {
            terms.insert(key, value);
        }
        terms
    }
}

impl From<BTreeMap<String, Value>> for FilterTerms {
    fn from(map: BTreeMap<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl From<Map<String, Value>> for FilterTerms {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl From<FilterTerms> for BTreeMap<String, Value> {
    fn from(terms: FilterTerms) -> Self {
        terms.terms
    }
}

impl IntoIterator for FilterTerms {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.into_iter()
    }
}
