//! Search API Main Entry Point
//!
//! Connects to OpenSearch, re-imports the configured datasets when the data
//! configuration has changed, and reports the outcome.

use dotenv::dotenv;
use search_api::{AppError, Dependencies};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("search_api=info,search_api_repository=info"));

    let json_output = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let result = if json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
    };
    result.map_err(|e| AppError::config(format!("Failed to initialize tracing: {}", e)))?;

    info!(
        service_name = "search-api",
        service_version = env!("CARGO_PKG_VERSION"),
        json_output = json_output,
        "Tracing initialized"
    );

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    info!("Starting search API");

    let deps = match Dependencies::new().await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let apis = deps.config.api_endpoint_names().await?;
    info!(apis = ?apis, "Search API ready");

    let Some(reindex) = deps.start_reindex().await? else {
        info!("No re-index needed");
        return Ok(());
    };

    tokio::select! {
        result = reindex.wait() => match result {
            Ok(summary) => {
                info!(indexed = summary.indexed, failed = summary.failed, "Re-index finished");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Re-index failed");
                Err(e.into())
            }
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, abandoning re-index");
            Ok(())
        }
    }
}
