//! Query service initialization and lifecycle management
//!
//! Startup is strictly ordered and fail-fast: nothing is served until the
//! model is loaded, the table is open and the encode pool exists.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum_helpers::server::{create_production_app, create_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_cpv::{
    CatalogRepository, CpvApiDoc, EmbeddingProvider, FastEmbedProvider, LanceCatalog,
    SearchService, handlers,
};
use eyre::{Result, WrapErr};
use tracing::info;

use crate::config::Config;

/// Upper bound on post-drain cleanup.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Full HTTP app: search routes plus docs, middleware and fallback.
pub fn build_router<R: CatalogRepository + 'static>(
    service: Arc<SearchService<R>>,
) -> Result<Router> {
    create_router::<CpvApiDoc>(handlers::router(service)).wrap_err("Failed to build router")
}

/// Run the query service
///
/// 1. Installs color-eyre and tracing
/// 2. Loads the embedding model
/// 3. Opens the existing catalog table (fatal if missing)
/// 4. Checks the model dimension and starts the encode pool
/// 5. Serves until SIGINT/SIGTERM, then stops the pool without waiting
pub async fn run() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let model = config.model.clone();
    let provider = tokio::task::spawn_blocking(move || FastEmbedProvider::load(&model))
        .await
        .wrap_err("Model loading task failed")?
        .wrap_err("Failed to load embedding model")?;
    let dimension = provider.dimension();

    let catalog = LanceCatalog::open(&config.lance)
        .await
        .wrap_err_with(|| format!("Failed to open catalog in {}", config.lance.uri()))?;

    let service = Arc::new(
        SearchService::new(Arc::new(provider), catalog, config.encode_workers)
            .wrap_err("Embedding model does not match the table schema")?,
    );

    let rows = service.health().await.wrap_err("Failed to count table rows")?.table_rows;
    info!(
        "Ready: {} rows in table, model dim={}, {} encode workers",
        rows,
        dimension,
        service.workers()
    );

    let router = build_router(Arc::clone(&service))?;
    let cleanup = async move {
        service.shutdown();
        info!("Shutdown complete.");
    };

    create_production_app(router, &config.server, SHUTDOWN_TIMEOUT, cleanup)
        .await
        .wrap_err("Server failed")?;

    Ok(())
}
