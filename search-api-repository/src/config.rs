//! Data configuration and the configuration store.
//!
//! A data directory holds a `data.yaml` file declaring, per API endpoint, the
//! logical index it is served from, the field mapping applied at ingestion,
//! and the data files to import. The store loads it once, hands out shared
//! snapshots, and remembers which configuration version was last imported.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::errors::SearchApiError;
use crate::field_mapper::FieldMapping;

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILENAME: &str = "data.yaml";

/// Name of the file recording the last imported configuration version.
pub const VERSION_MARKER_FILENAME: &str = ".indexed-version";

/// Data directory used when none is configured.
pub const DEFAULT_DATA_PATH: &str = "./sample-data";

/// Page size used when the configuration does not declare one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// A data file declared for an API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFile {
    /// Path of the file, relative to the data directory.
    pub name: String,
}

/// Configuration of a single API endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Logical index name (scoped by environment at lookup time).
    pub index: String,

    /// External field name to indexed field name.
    #[serde(default)]
    pub dictionary: FieldMapping,

    /// Files imported into the index.
    #[serde(default)]
    pub files: Vec<DataFile>,
}

/// Parsed contents of `data.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Version of the configuration. A change triggers a full re-import.
    #[serde(default)]
    pub version: Option<String>,

    /// Default number of results per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// API endpoints keyed by name.
    #[serde(default)]
    pub apis: BTreeMap<String, ApiConfig>,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl DataConfig {
    /// Parse a configuration document.
    pub fn from_yaml(contents: &str) -> Result<Self, SearchApiError> {
        serde_yaml::from_str(contents)
            .map_err(|e| SearchApiError::configuration(format!("Invalid {}: {}", CONFIG_FILENAME, e)))
    }

    /// Read and parse `data.yaml` from a data directory.
    pub fn from_dir(dir: &Path) -> Result<Self, SearchApiError> {
        let path = dir.join(CONFIG_FILENAME);
        let contents = fs::read_to_string(&path).map_err(|e| {
            SearchApiError::configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&contents)
    }

    /// Logical index configured for an API endpoint.
    pub fn find_index_for_api(&self, api: &str) -> Option<&str> {
        self.apis.get(api).map(|config| config.index.as_str())
    }

    /// Names of every configured API endpoint, sorted.
    pub fn api_endpoint_names(&self) -> Vec<String> {
        self.apis.keys().cloned().collect()
    }
}

/// Holds the data configuration for the process lifetime.
///
/// Loading is compute-once: concurrent first callers of
/// [`ConfigStore::load_if_needed`] observe a single load. The snapshot is only
/// replaced by an explicit [`ConfigStore::load`] or [`ConfigStore::reload`].
pub struct ConfigStore {
    data_path: PathBuf,
    current: RwLock<Option<Arc<DataConfig>>>,
}

impl ConfigStore {
    /// Create a store reading from `data_path`. Nothing is read until first use.
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            current: RwLock::new(None),
        }
    }

    /// Create a store that is already loaded with `config`.
    pub fn with_config(data_path: impl Into<PathBuf>, config: DataConfig) -> Self {
        Self {
            data_path: data_path.into(),
            current: RwLock::new(Some(Arc::new(config))),
        }
    }

    /// The data directory this store reads from.
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Return the loaded configuration, loading it from the data path first
    /// if this is the first call.
    pub async fn load_if_needed(&self) -> Result<Arc<DataConfig>, SearchApiError> {
        if let Some(config) = self.current.read().await.as_ref() {
            return Ok(Arc::clone(config));
        }

        let mut current = self.current.write().await;
        if let Some(config) = current.as_ref() {
            return Ok(Arc::clone(config));
        }

        let config = Arc::new(DataConfig::from_dir(&self.data_path)?);
        info!(
            data_path = %self.data_path.display(),
            version = ?config.version,
            apis = ?config.api_endpoint_names(),
            "Loaded data configuration"
        );
        *current = Some(Arc::clone(&config));
        Ok(config)
    }

    /// Load the configuration from `path` and make it current.
    pub async fn load(&self, path: &Path) -> Result<Arc<DataConfig>, SearchApiError> {
        let config = Arc::new(DataConfig::from_dir(path)?);
        info!(
            data_path = %path.display(),
            version = ?config.version,
            "Loaded data configuration"
        );
        *self.current.write().await = Some(Arc::clone(&config));
        Ok(config)
    }

    /// Re-read the configuration from the data path.
    pub async fn reload(&self) -> Result<Arc<DataConfig>, SearchApiError> {
        self.load(&self.data_path).await
    }

    /// Logical index configured for an API endpoint.
    pub async fn find_index_for_api(&self, api: &str) -> Result<Option<String>, SearchApiError> {
        let config = self.load_if_needed().await?;
        Ok(config.find_index_for_api(api).map(str::to_string))
    }

    /// Names of every configured API endpoint.
    pub async fn api_endpoint_names(&self) -> Result<Vec<String>, SearchApiError> {
        Ok(self.load_if_needed().await?.api_endpoint_names())
    }

    /// Default number of results per page.
    pub async fn page_size(&self) -> Result<u64, SearchApiError> {
        Ok(self.load_if_needed().await?.page_size)
    }

    /// Returns true if `config` has not been imported yet.
    ///
    /// A configuration without a version is always considered new.
    pub fn is_new(&self, config: &DataConfig) -> Result<bool, SearchApiError> {
        let Some(version) = config.version.as_deref() else {
            return Ok(true);
        };
        let indexed = self.indexed_version()?;
        debug!(version = %version, indexed = ?indexed, "Comparing configuration versions");
        Ok(indexed.as_deref() != Some(version))
    }

    /// Record that `config` has been fully imported.
    pub fn mark_indexed(&self, config: &DataConfig) -> Result<(), SearchApiError> {
        let Some(version) = config.version.as_deref() else {
            return Ok(());
        };
        let path = self.data_path.join(VERSION_MARKER_FILENAME);
        fs::write(&path, version).map_err(|e| {
            SearchApiError::configuration(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    fn indexed_version(&self) -> Result<Option<String>, SearchApiError> {
        let path = self.data_path.join(VERSION_MARKER_FILENAME);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SearchApiError::configuration(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
version: "2015-06-01"
page_size: 50
apis:
  colleges:
    index: colleges
    dictionary:
      school.name: name
      school.degrees_awarded.predominant: level
    files:
      - name: colleges.csv
  cities:
    index: city-data
"#;

    fn data_dir(contents: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), contents).unwrap();
        dir
    }

    #[test]
    fn test_parse_config() {
        let config = DataConfig::from_yaml(CONFIG).unwrap();
        assert_eq!(config.version.as_deref(), Some("2015-06-01"));
        assert_eq!(config.page_size, 50);
        assert_eq!(config.find_index_for_api("colleges"), Some("colleges"));
        assert_eq!(config.find_index_for_api("cities"), Some("city-data"));
        assert_eq!(config.find_index_for_api("unknown"), None);
        assert_eq!(config.api_endpoint_names(), vec!["cities", "colleges"]);

        let colleges = &config.apis["colleges"];
        assert_eq!(colleges.dictionary.lookup("school.name"), Some("name"));
        assert_eq!(colleges.files[0].name, "colleges.csv");
        assert!(config.apis["cities"].files.is_empty());
    }

    #[test]
    fn test_page_size_defaults() {
        let config = DataConfig::from_yaml("apis: {}").unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.version.is_none());
    }

    #[test]
    fn test_invalid_yaml_is_configuration_error() {
        let result = DataConfig::from_yaml("apis: [not, a, map]");
        assert!(matches!(result, Err(SearchApiError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_load_if_needed_is_idempotent() {
        let dir = data_dir(CONFIG);
        let store = ConfigStore::new(dir.path());

        let first = store.load_if_needed().await.unwrap();
        // Changes on disk are not picked up without an explicit reload
        fs::write(dir.path().join(CONFIG_FILENAME), "apis: {}").unwrap();
        let second = store.load_if_needed().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let reloaded = store.reload().await.unwrap();
        assert!(reloaded.apis.is_empty());
        assert!(store.find_index_for_api("colleges").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_first_loads_share_snapshot() {
        let dir = data_dir(CONFIG);
        let store = Arc::new(ConfigStore::new(dir.path()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.load_if_needed().await.unwrap() })
            })
            .collect();

        let mut snapshots = Vec::new();
        for handle in handles {
            snapshots.push(handle.await.unwrap());
        }
        assert!(snapshots.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[tokio::test]
    async fn test_missing_config_file() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path());
        let result = store.load_if_needed().await;
        assert!(matches!(result, Err(SearchApiError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_store_accessors() {
        let dir = data_dir(CONFIG);
        let store = ConfigStore::new(dir.path());
        assert_eq!(store.page_size().await.unwrap(), 50);
        assert_eq!(
            store.api_endpoint_names().await.unwrap(),
            vec!["cities".to_string(), "colleges".to_string()]
        );
        assert_eq!(
            store.find_index_for_api("colleges").await.unwrap().as_deref(),
            Some("colleges")
        );
        assert_eq!(store.data_path(), dir.path());
    }

    #[test]
    fn test_is_new_tracks_indexed_version() {
        let dir = data_dir(CONFIG);
        let store = ConfigStore::new(dir.path());
        let config = DataConfig::from_yaml(CONFIG).unwrap();

        assert!(store.is_new(&config).unwrap());
        store.mark_indexed(&config).unwrap();
        assert!(!store.is_new(&config).unwrap());

        let mut changed = config.clone();
        changed.version = Some("2016-01-01".to_string());
        assert!(store.is_new(&changed).unwrap());
    }

    #[test]
    fn test_unversioned_config_is_always_new() {
        let dir = data_dir("apis: {}");
        let store = ConfigStore::new(dir.path());
        let config = DataConfig::from_yaml("apis: {}").unwrap();

        store.mark_indexed(&config).unwrap();
        assert!(store.is_new(&config).unwrap());
        assert!(!dir.path().join(VERSION_MARKER_FILENAME).exists());
    }
}
