//! Index lifecycle management.
//!
//! Creates, re-creates and deletes the physical indices behind each API, and
//! re-imports every dataset in the background when the data configuration
//! changes.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use crate::config::{ConfigStore, DataConfig};
use crate::errors::SearchApiError;
use crate::importer::Importer;
use crate::interfaces::SearchIndexProvider;
use crate::naming::IndexNameResolver;
use crate::opensearch::get_index_settings;
use crate::types::ImportSummary;

/// Completion handle for a background re-index.
///
/// Dropping the handle leaves the task running; awaiting [`ReindexHandle::wait`]
/// yields its outcome.
#[derive(Debug)]
pub struct ReindexHandle {
    handle: JoinHandle<Result<ImportSummary, SearchApiError>>,
}

impl ReindexHandle {
    /// Wait for the re-index to finish.
    pub async fn wait(self) -> Result<ImportSummary, SearchApiError> {
        self.handle
            .await
            .map_err(|e| SearchApiError::reindex_task(e.to_string()))?
    }
}

/// Manages physical indices for the configured APIs.
pub struct IndexLifecycle {
    provider: Arc<dyn SearchIndexProvider>,
    resolver: IndexNameResolver,
    config: Arc<ConfigStore>,
    importer: Importer,
}

impl IndexLifecycle {
    /// Create a lifecycle manager with a default importer.
    pub fn new(
        provider: Arc<dyn SearchIndexProvider>,
        resolver: IndexNameResolver,
        config: Arc<ConfigStore>,
    ) -> Self {
        let importer = Importer::new(Arc::clone(&provider));
        Self::with_importer(provider, resolver, config, importer)
    }

    /// Create a lifecycle manager with a custom importer.
    pub fn with_importer(
        provider: Arc<dyn SearchIndexProvider>,
        resolver: IndexNameResolver,
        config: Arc<ConfigStore>,
        importer: Importer,
    ) -> Self {
        Self {
            provider,
            resolver,
            config,
            importer,
        }
    }

    /// Create a fresh index, deleting any existing index of that name first.
    pub async fn create_index(&self, scoped_index_name: &str) -> Result<(), SearchApiError> {
        if let Err(e) = self.provider.delete_index(scoped_index_name).await {
            warn!(
                index = %scoped_index_name,
                error = %e,
                "Failed to delete index before re-creating it"
            );
        }

        self.provider
            .create_index(scoped_index_name, &get_index_settings())
            .await?;
        Ok(())
    }

    /// Create the index for a logical name unless it already exists.
    ///
    /// Returns the scoped index name either way.
    pub async fn create_index_if_needed(&self, logical_name: &str) -> Result<String, SearchApiError> {
        let index = self.resolver.scoped_index_name(logical_name).await?;
        if self.provider.index_exists(&index).await? {
            info!(index = %index, "Index already exists");
        } else {
            info!(index = %index, "Creating index");
            self.create_index(&index).await?;
        }
        Ok(index)
    }

    /// Delete the index for a logical name and clear the query cache.
    pub async fn delete_index(&self, logical_name: &str) -> Result<(), SearchApiError> {
        let index = self.resolver.scoped_index_name(logical_name).await?;
        self.provider.delete_index(&index).await?;
        self.provider.clear_cache().await?;
        info!(index = %index, "Deleted index");
        Ok(())
    }

    /// Re-create and re-import every configured API from the current
    /// configuration.
    pub async fn import_all(&self) -> Result<ImportSummary, SearchApiError> {
        let config = self.config.load_if_needed().await?;
        self.import_config(&config).await
    }

    #[instrument(skip(self, config), fields(version = ?config.version))]
    async fn import_config(&self, config: &DataConfig) -> Result<ImportSummary, SearchApiError> {
        let mut summary = ImportSummary::default();
        let mut recreated = HashSet::new();

        for (api, api_config) in &config.apis {
            let index = self.resolver.scoped_index_name(&api_config.index).await?;
            // Several APIs may share an index; only wipe it once
            if recreated.insert(index.clone()) {
                self.create_index(&index).await?;
            }

            for file in &api_config.files {
                let path = self.config.data_path().join(&file.name);
                let file_summary = self
                    .importer
                    .import_file(&index, &path, &api_config.dictionary)
                    .await?;
                summary.files += file_summary.files;
                summary.rows += file_summary.rows;
                summary.indexed += file_summary.indexed;
                summary.failed += file_summary.failed;
            }

            summary.apis += 1;
            info!(api = %api, index = %index, "Imported api");
        }

        Ok(summary)
    }

    /// Re-import everything in the background if the configuration in the
    /// data path has not been imported before.
    ///
    /// Returns `None` when the configuration is already indexed. The version
    /// is recorded only when every document was accepted; otherwise the
    /// handle yields `SearchApiError::ImportIncomplete`.
    pub async fn reindex_if_needed(
        self: &Arc<Self>,
    ) -> Result<Option<ReindexHandle>, SearchApiError> {
        let config = self.config.load(self.config.data_path()).await?;
        if !self.config.is_new(&config)? {
            info!(version = ?config.version, "Data configuration already indexed");
            return Ok(None);
        }

        info!(version = ?config.version, "New data configuration detected, re-indexing");
        let lifecycle = Arc::clone(self);
        let handle = tokio::spawn(async move {
            info!("Re-index started");
            let result = lifecycle
                .import_config(&config)
                .await
                .and_then(|summary| {
                    // Partial imports leave the version unrecorded
                    if summary.failed > 0 {
                        Err(SearchApiError::import_incomplete(summary.rows, summary.failed))
                    } else {
                        Ok(summary)
                    }
                });
            match &result {
                Ok(summary) => {
                    if let Err(e) = lifecycle.config.mark_indexed(&config) {
                        error!(error = %e, "Failed to record indexed configuration version");
                    }
                    info!(
                        apis = summary.apis,
                        files = summary.files,
                        rows = summary.rows,
                        indexed = summary.indexed,
                        "Re-index completed"
                    );
                }
                Err(e) => error!(error = %e, "Re-index failed"),
            }
            result
        });

        Ok(Some(ReindexHandle { handle }))
    }
}
