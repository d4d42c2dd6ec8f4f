//! Dependency initialization and wiring for the search API.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use super::credentials::CredentialProvider;
use super::settings::{ConnectionMode, Settings};
use crate::AppError;
use search_api_repository::{
    ConfigStore, IndexLifecycle, IndexNameResolver, OpenSearchProvider, ReindexHandle,
    SearchIndexError, SearchIndexProvider, SearchService,
};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Settings the dependencies were built from.
    pub settings: Settings,
    /// Shared data configuration.
    pub config: Arc<ConfigStore>,
    /// Search facade.
    pub search: Arc<SearchService>,
    /// Index lifecycle manager.
    pub lifecycle: Arc<IndexLifecycle>,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// See [`Settings`] for the variables read.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If credentials are missing or the connection
    ///   fails in fail-fast mode
    pub async fn new() -> Result<Self, AppError> {
        let settings = Settings::from_env();
        let credentials = CredentialProvider::from_env()?;
        Self::connect(settings, &credentials).await
    }

    /// Connect to OpenSearch using discovered credentials and wire the
    /// services.
    pub async fn connect(
        settings: Settings,
        credentials: &CredentialProvider,
    ) -> Result<Self, AppError> {
        let opensearch_url = credentials.search_url(&settings.search_service)?;

        info!(
            app_env = %settings.app_env,
            data_path = %settings.data_path.display(),
            managed_platform = credentials.is_managed(),
            search_service = %settings.search_service,
            connection_mode = ?settings.connection_mode,
            retry_interval_secs = settings.retry_interval.as_secs(),
            reindex_on_start = settings.reindex_on_start,
            "Initializing dependencies"
        );

        let provider = Self::connect_to_opensearch(
            &opensearch_url,
            settings.connection_mode,
            settings.retry_interval,
        )
        .await?;

        info!("OpenSearch connection established");

        Ok(Self::with_provider(settings, Arc::new(provider)))
    }

    /// Wire the services around an already connected provider.
    pub fn with_provider(settings: Settings, provider: Arc<dyn SearchIndexProvider>) -> Self {
        if settings.app_env.is_empty() {
            warn!("APP_ENV is not set, index names will have an empty environment prefix");
        }

        let config = Arc::new(ConfigStore::new(settings.data_path.clone()));
        let resolver = IndexNameResolver::new(settings.app_env.clone(), Arc::clone(&config));
        let search = Arc::new(SearchService::new(
            Arc::clone(&provider),
            Arc::clone(&config),
            resolver.clone(),
        ));
        let lifecycle = Arc::new(IndexLifecycle::new(provider, resolver, Arc::clone(&config)));

        Self {
            settings,
            config,
            search,
            lifecycle,
        }
    }

    /// Start the background re-index if enabled and the data configuration
    /// has not been imported yet.
    pub async fn start_reindex(&self) -> Result<Option<ReindexHandle>, AppError> {
        if !self.settings.reindex_on_start {
            info!("Re-index on start disabled");
            return Ok(None);
        }
        Ok(self.lifecycle.reindex_if_needed().await?)
    }

    /// Connect to OpenSearch with retry logic based on connection mode.
    async fn connect_to_opensearch(
        url: &str,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<OpenSearchProvider, AppError> {
        loop {
            match Self::try_connect_opensearch(url).await {
                Ok(provider) => return Ok(provider),
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(AppError::config(format!(
                            "Failed to connect to OpenSearch: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to OpenSearch, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }

    /// Attempt to connect to OpenSearch and check that it responds.
    async fn try_connect_opensearch(url: &str) -> Result<OpenSearchProvider, SearchIndexError> {
        let provider = OpenSearchProvider::new(url).await?;
        provider.ping().await?;
        Ok(provider)
    }
}
