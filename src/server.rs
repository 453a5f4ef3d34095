//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, cache setup, background task spawning, and Axum server lifecycle.

use crate::application::services::CleanupScheduler;
use crate::config::{Config, StorageBackend};
use crate::domain::click_worker::run_click_worker;
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::{CacheService, MemoryCache, NullCache, RedisCache};
use crate::infrastructure::persistence::{MemoryLinkRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

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
/// - Link store (PostgreSQL with migrations applied, or in-memory)
/// - Cache (Redis, falling back to in-memory or no-op)
/// - Background click worker
/// - Daily cleanup scheduler
/// - Axum HTTP server, stopped by Ctrl-C or SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let link_repository: Arc<dyn LinkRepository> = match config.storage_backend {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;
            let pool = connect_pool(&config, database_url).await?;
            Arc::new(PgLinkRepository::new(Arc::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; links are lost on restart");
            Arc::new(MemoryLinkRepository::new())
        }
    };

    let cache = build_cache(&config, clock.clone()).await;

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    tokio::spawn(run_click_worker(
        click_rx,
        link_repository.clone(),
        config.click_worker_concurrency,
    ));
    tracing::info!("Click worker started");

    let scheduler = CleanupScheduler::new(link_repository.clone(), clock.clone(), config.cleanup_at);
    tokio::spawn(async move { scheduler.run().await });

    let state = AppState::new(
        link_repository,
        cache,
        clock,
        click_tx,
        config.cache_policy(),
        config.shortener_config(),
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Opens the PostgreSQL pool and applies pending migrations.
pub async fn connect_pool(config: &Config, database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}

/// Picks the cache backend.
///
/// Redis when configured and reachable; otherwise an in-process cache for the
/// memory backend and no cache at all in front of PostgreSQL.
async fn build_cache(config: &Config, clock: Arc<dyn Clock>) -> Arc<dyn CacheService> {
    let fallback = || -> Arc<dyn CacheService> {
        match config.storage_backend {
            StorageBackend::Memory => Arc::new(MemoryCache::with_clock(clock.clone())),
            StorageBackend::Postgres => Arc::new(NullCache::new()),
        }
    };

    let Some(redis_url) = &config.redis_url else {
        let cache = fallback();
        tracing::info!(backend = cache.backend(), "Redis not configured");
        return cache;
    };

    match RedisCache::connect(redis_url).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            let cache = fallback();
            tracing::warn!(error = %e, backend = cache.backend(), "Failed to connect to Redis");
            cache
        }
    }
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
