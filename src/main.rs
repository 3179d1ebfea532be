//! Request Cache - a cache-aside layer in front of a remote API
//!
//! Serves `POST /request` from a size-bounded cache and forwards misses to
//! the configured upstream.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use request_cache::api::create_router;
use request_cache::{
    spawn_event_logger, spawn_request_dispatcher, AppState, Config, HttpFetcher, MemoryBlobStore,
};

/// Main entry point for the request cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the cache over an in-memory blob store and open it
/// 4. Build the upstream HTTP fetcher and orchestrator
/// 5. Spawn the request dispatcher and the event logger
/// 6. Create Axum router with all endpoints
/// 7. Start HTTP server on configured port
/// 8. Handle graceful shutdown on SIGINT/SIGTERM, then stop background tasks
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "request_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Request Cache Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: strategy={}, max_cache_size={}B, threshold={}, background_registration={}, port={}, upstream={}",
        config.cache.eviction_strategy,
        config.cache.max_cache_size,
        config.cache.eviction_threshold,
        config.cache.use_background_registration,
        config.server_port,
        config.upstream_url
    );

    let state = AppState::from_config(
        &config,
        Arc::new(MemoryBlobStore::new()),
        Arc::new(HttpFetcher::new(config.upstream_url.clone())),
    );
    state
        .cache
        .init()
        .await
        .context("failed to open the cache store")?;
    info!("Cache store initialized");

    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let dispatcher = spawn_request_dispatcher(state.orchestrator.clone(), request_rx, event_tx);
    let event_logger = spawn_event_logger(event_rx);
    info!("Request dispatcher started");

    let app = create_router(state.with_dispatcher(request_tx));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    dispatcher.abort();
    event_logger.abort();
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
