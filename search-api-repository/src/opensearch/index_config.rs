//! OpenSearch index configuration and mappings.
//!
//! Every dataset index is created with the same body: everything is mapped
//! dynamically except the `location` field, which must be declared up front as
//! a `geo_point` for distance filters to work.

use serde_json::{json, Value};

/// Field holding a document's coordinates.
pub const LOCATION_FIELD: &str = "location";

/// Get the index settings and mappings for a dataset index.
///
/// # Sharding Configuration
///
/// - 1 primary shard
/// - 1 replica for redundancy
pub fn get_index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                LOCATION_FIELD: {
                    "type": "geo_point"
                }
            }
        }
    })
}
