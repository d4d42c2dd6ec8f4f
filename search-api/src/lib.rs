//! # Search API
//!
//! Environment-scoped search over OpenSearch for datasets declared in a data
//! directory.
//!
//! ## Startup
//!
//! 1. **Settings**: Read from the environment (and `.env`)
//! 2. **Credentials**: Discovered from the managed platform or the environment
//! 3. **Connection**: OpenSearch is connected with retry or fail-fast
//! 4. **Re-index**: Datasets are re-imported in the background when the data
//!    configuration has a version that was not imported yet
//!
//! ## Modules
//!
//! - [`config`]: Settings, credential discovery and dependency wiring

pub mod config;

pub use config::{ConnectionMode, CredentialProvider, Dependencies, Settings};

use search_api_repository::SearchApiError;
use thiserror::Error;

/// Errors that can occur during startup or execution.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error from the search API.
    #[error("Search API error: {0}")]
    Api(#[from] SearchApiError),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
