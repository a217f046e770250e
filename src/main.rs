use std::sync::Arc;

use marquee_api::{
    config::Config,
    db::{create_redis_client, Cache, CacheWriterHandle},
    routes::{create_router, AppState},
    services::{
        providers::{CatalogProvider, TmdbProvider},
        DiscoveryOrchestrator, FilterResolver, SearchService,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("marquee_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let (cache, cache_handle) = build_cache(&config).await?;
    tracing::info!(cache_enabled = cache.is_enabled(), "Cache configured");

    let tmdb = Arc::new(TmdbProvider::new(
        cache,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_language.clone(),
    ));
    let catalog: Arc<dyn CatalogProvider> = tmdb.clone();

    let search = SearchService::new(
        Arc::clone(&catalog),
        FilterResolver::new(tmdb.clone(), tmdb),
        DiscoveryOrchestrator::new(Arc::clone(&catalog)),
    );

    let app = create_router(Arc::new(AppState { search, catalog }));

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(address = %listener.local_addr()?, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    Ok(())
}

async fn build_cache(config: &Config) -> anyhow::Result<(Cache, Option<CacheWriterHandle>)> {
    match &config.redis_url {
        Some(url) => {
            let client = create_redis_client(url)?;
            let (cache, handle) = Cache::new(client).await;
            Ok((cache, Some(handle)))
        }
        None => {
            tracing::info!("REDIS_URL not set, caching disabled");
            Ok((Cache::disabled(), None))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
