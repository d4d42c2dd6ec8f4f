//! Settings read from the process environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use search_api_repository::config::DEFAULT_DATA_PATH;
use tracing::warn;

/// Default search service name on the managed platform.
const DEFAULT_SEARCH_SERVICE: &str = "eservice";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Connection mode for OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection at a fixed interval until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse a connection mode.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive).
    /// Defaults to "retry" if not set or invalid.
    fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or("retry").to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            other => {
                warn!(value = %other, "Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Process settings.
///
/// # Environment Variables
///
/// - `APP_ENV`: Environment tag prefixed to every index name (default: empty)
/// - `DATA_PATH`: Directory holding `data.yaml` and the data files (default: ./sample-data)
/// - `VCAP_APPLICATION`: Present when running on the managed platform
/// - `SEARCH_SERVICE_NAME`: Bound search service name (default: eservice)
/// - `OPENSEARCH_CONNECTION_MODE`: Connection mode - "fail-fast" or "retry" (default: retry)
/// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
/// - `REINDEX_ON_START`: Re-index changed data at startup (default: true on the managed platform)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub app_env: String,
    pub data_path: PathBuf,
    pub managed_platform: bool,
    pub search_service: String,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
    pub reindex_on_start: bool,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns the value of a variable
    /// if it is set.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let managed_platform = lookup("VCAP_APPLICATION").is_some();

        let retry_interval = lookup("OPENSEARCH_RETRY_INTERVAL_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_INTERVAL_SECS);

        let reindex_on_start = match lookup("REINDEX_ON_START") {
            Some(value) => parse_flag(&value).unwrap_or_else(|| {
                warn!(value = %value, "Invalid REINDEX_ON_START, using the platform default");
                managed_platform
            }),
            None => managed_platform,
        };

        Self {
            app_env: lookup("APP_ENV").unwrap_or_default(),
            data_path: lookup("DATA_PATH")
                .filter(|path| !path.is_empty())
                .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string())
                .into(),
            managed_platform,
            search_service: lookup("SEARCH_SERVICE_NAME")
                .unwrap_or_else(|| DEFAULT_SEARCH_SERVICE.to_string()),
            connection_mode: ConnectionMode::parse(
                lookup("OPENSEARCH_CONNECTION_MODE").as_deref(),
            ),
            retry_interval: Duration::from_secs(retry_interval),
            reindex_on_start,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[]);
        assert_eq!(settings.app_env, "");
        assert_eq!(settings.data_path, PathBuf::from("./sample-data"));
        assert!(!settings.managed_platform);
        assert_eq!(settings.search_service, "eservice");
        assert_eq!(settings.connection_mode, ConnectionMode::Retry);
        assert_eq!(settings.retry_interval, Duration::from_secs(15));
        assert!(!settings.reindex_on_start);
    }

    #[test]
    fn test_managed_platform_reindexes_by_default() {
        let settings = settings(&[("VCAP_APPLICATION", "{}"), ("APP_ENV", "production")]);
        assert!(settings.managed_platform);
        assert!(settings.reindex_on_start);
        assert_eq!(settings.app_env, "production");
    }

    #[test]
    fn test_explicit_values() {
        let settings = settings(&[
            ("DATA_PATH", "/srv/data"),
            ("OPENSEARCH_CONNECTION_MODE", "FAIL-FAST"),
            ("OPENSEARCH_RETRY_INTERVAL_SECS", "3"),
            ("REINDEX_ON_START", "yes"),
        ]);
        assert_eq!(settings.data_path, PathBuf::from("/srv/data"));
        assert_eq!(settings.connection_mode, ConnectionMode::FailFast);
        assert_eq!(settings.retry_interval, Duration::from_secs(3));
        assert!(settings.reindex_on_start);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let settings = settings(&[
            ("VCAP_APPLICATION", "{}"),
            ("OPENSEARCH_CONNECTION_MODE", "sometimes"),
            ("OPENSEARCH_RETRY_INTERVAL_SECS", "soon"),
            ("REINDEX_ON_START", "maybe"),
        ]);
        assert_eq!(settings.connection_mode, ConnectionMode::Retry);
        assert_eq!(settings.retry_interval, Duration::from_secs(15));
        assert!(settings.reindex_on_start);
    }
}
