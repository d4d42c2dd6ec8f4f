//! Index naming.
//!
//! Every physical index is prefixed with the deployment environment so that
//! several environments can share one search cluster.

use std::sync::Arc;

use search_api_shared::SearchOptions;
use tracing::{debug, warn};

use crate::config::ConfigStore;
use crate::errors::SearchApiError;

/// Derives scoped index names from logical names and API endpoints.
#[derive(Clone)]
pub struct IndexNameResolver {
    environment: String,
    config: Arc<ConfigStore>,
}

impl IndexNameResolver {
    /// Create a resolver for an environment tag.
    ///
    /// An empty tag is accepted; names then resolve to `-{name}`.
    pub fn new(environment: impl Into<String>, config: Arc<ConfigStore>) -> Self {
        Self {
            environment: environment.into(),
            config,
        }
    }

    /// Scope a logical name to the current environment.
    ///
    /// The data configuration is loaded first if it has not been yet.
    pub async fn scoped_index_name(&self, name: &str) -> Result<String, SearchApiError> {
        self.config.load_if_needed().await?;
        Ok(format!("{}-{}", self.environment, name))
    }

    /// Resolve the scoped index a search should run against.
    ///
    /// `api` is looked up in the data configuration and takes precedence over
    /// `index`, which is used as a logical name directly.
    pub async fn resolve_index_from_options(
        &self,
        options: &SearchOptions,
    ) -> Result<String, SearchApiError> {
        if options.is_ambiguous() {
            // Reported only; api still takes precedence below
            warn!(
                api = ?options.api,
                index = ?options.index,
                "Search options api will override index, only one expected"
            );
        }

        let logical_name = match (&options.api, &options.index) {
            (Some(api), _) => match self.config.find_index_for_api(api).await? {
                Some(index) => index,
                None => {
                    let available = self.config.api_endpoint_names().await?;
                    return Err(SearchApiError::configuration_not_found(api, available));
                }
            },
            (None, Some(index)) => index.clone(),
            (None, None) => return Err(SearchApiError::NoIndexSelected),
        };

        let scoped = self.scoped_index_name(&logical_name).await?;
        debug!(logical_name = %logical_name, scoped = %scoped, "Resolved index");
        Ok(scoped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataConfig;

    fn store() -> Arc<ConfigStore> {
        let config = DataConfig::from_yaml(
            r#"
apis:
  colleges:
    index: colleges
  cities:
    index: city-data
"#,
        )
        .unwrap();
        Arc::new(ConfigStore::with_config("./unused", config))
    }

    #[tokio::test]
    async fn test_scoped_index_name_is_deterministic() {
        let resolver = IndexNameResolver::new("test", store());
        let first = resolver.scoped_index_name("colleges").await.unwrap();
        let second = resolver.scoped_index_name("colleges").await.unwrap();
        assert_eq!(first, "test-colleges");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_environment_fails_open() {
        let resolver = IndexNameResolver::new("", store());
        assert_eq!(
            resolver.scoped_index_name("colleges").await.unwrap(),
            "-colleges"
        );
    }

    #[tokio::test]
    async fn test_resolve_api_uses_configured_index() {
        let resolver = IndexNameResolver::new("test", store());
        let index = resolver
            .resolve_index_from_options(&SearchOptions::api("cities"))
            .await
            .unwrap();
        assert_eq!(index, "test-city-data");
    }

    #[tokio::test]
    async fn test_resolve_index_scopes_logical_name() {
        let resolver = IndexNameResolver::new("test", store());
        let index = resolver
            .resolve_index_from_options(&SearchOptions::index("places"))
            .await
            .unwrap();
        assert_eq!(index, "test-places");
    }

    #[tokio::test]
    async fn test_api_wins_over_index() {
        let resolver = IndexNameResolver::new("test", store());
        let options = SearchOptions::api("colleges").with_index("other");
        let index = resolver.resolve_index_from_options(&options).await.unwrap();
        assert_eq!(index, "test-colleges");
    }

    #[tokio::test]
    async fn test_unknown_api_lists_endpoints() {
        let resolver = IndexNameResolver::new("test", store());
        let err = resolver
            .resolve_index_from_options(&SearchOptions::api("unknown"))
            .await
            .unwrap_err();

        match err {
            SearchApiError::ConfigurationNotFound { api, available } => {
                assert_eq!(api, "unknown");
                assert_eq!(available, vec!["cities".to_string(), "colleges".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_api_or_index() {
        let resolver = IndexNameResolver::new("test", store());
        let result = resolver
            .resolve_index_from_options(&SearchOptions::default())
            .await;
        assert!(matches!(result, Err(SearchApiError::NoIndexSelected)));
    }
}
