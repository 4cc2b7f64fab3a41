//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, worker spawning, and Axum server lifecycle.

use crate::config::Config;
use crate::domain::click_recorder::ClickRecorder;
use crate::domain::click_worker::{VisitProcessor, run_visit_worker};
use crate::domain::dedup::DedupWindow;
use crate::domain::geo::GeoLocator;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::geo::{HttpGeoLocator, NullGeoLocator};
use crate::infrastructure::persistence::{
    PgLinkRepository, PgLinkTreeRepository, PgStatsRepository, PgTokenRepository,
};
use crate::routes::app_router;
use crate::state::{AppState, Repositories, StateOptions};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations
/// - Redis resolution cache (or NullCache fallback)
/// - IP geolocation client
/// - Background visit worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if the database is unreachable, migrations fail, or the
/// listener cannot bind.
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let cache = connect_cache(&config).await;
    let geo = build_geo_locator(&config)?;

    let pool = Arc::new(pool);
    let repositories = Repositories {
        links: Arc::new(PgLinkRepository::new(pool.clone())),
        linktrees: Arc::new(PgLinkTreeRepository::new(pool.clone())),
        stats: Arc::new(PgStatsRepository::new(pool.clone())),
        tokens: Arc::new(PgTokenRepository::new(pool.clone())),
    };

    let (visit_tx, visit_rx) = mpsc::channel(config.visit_queue_capacity);
    let processor = VisitProcessor::new(repositories.stats.clone(), geo, config.geoip_timeout());
    let worker = tokio::spawn(run_visit_worker(
        visit_rx,
        processor,
        config.visit_worker_concurrency,
    ));
    tracing::info!(
        concurrency = config.visit_worker_concurrency,
        "Visit worker started"
    );

    let dedup = Arc::new(DedupWindow::new(
        config.click_dedup_window(),
        config.click_dedup_evict_after(),
    ));
    let recorder = ClickRecorder::new(dedup, visit_tx);

    let state = AppState::new(
        repositories,
        cache,
        recorder,
        StateOptions {
            public_base_url: config.public_base_url.clone(),
            token_signing_secret: config.token_signing_secret.clone(),
            behind_proxy: config.behind_proxy,
        },
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and with it the last queue sender) is gone; let the worker
    // drain what is still queued.
    if let Err(e) = worker.await {
        tracing::error!(error = %e, "Visit worker panicked");
    }

    Ok(())
}

async fn connect_database(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

fn build_geo_locator(config: &Config) -> Result<Arc<dyn GeoLocator>> {
    let locator: Arc<dyn GeoLocator> = match &config.geoip_api_url {
        Some(url) => Arc::new(
            HttpGeoLocator::new(url.clone(), config.geoip_timeout())
                .context("Failed to build geolocation client")?,
        ),
        None => Arc::new(NullGeoLocator),
    };

    tracing::info!(provider = locator.name(), "Geolocation configured");
    Ok(locator)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
