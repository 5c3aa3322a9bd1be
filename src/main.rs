//! Tandem Cache - a two-tier read-through cache
//!
//! Runs the cache engine with its administrative HTTP surface.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tandem_cache::api::{create_router, AppState};
use tandem_cache::cache::{CacheEngine, DurableStore};
use tandem_cache::config::Config;
use tandem_cache::tasks::spawn_sweep_task;

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the durable tier (creating its table if needed)
/// 4. Construct the cache engine
/// 5. Start the background sweep task
/// 6. Create the Axum router with the administrative endpoints
/// 7. Start the HTTP server on the configured port
/// 8. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tandem_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tandem Cache");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: max_memory_entries={}, default_ttl={}ms, sweep_interval={}s, port={}",
        config.max_memory_entries,
        config.default_ttl_ms,
        config.sweep_interval_secs,
        config.server_port
    );

    // Connect the durable tier
    let durable = DurableStore::connect(&config.database_url)
        .await
        .with_context(|| format!("failed to open durable tier at {}", config.database_url))?;
    info!("Durable tier ready at {}", config.database_url);

    // One engine for the whole process, injected everywhere it is needed
    let engine = Arc::new(CacheEngine::from_config(&config, durable));
    let state = AppState::new(Arc::clone(&engine));
    info!("Cache engine initialized");

    // Start the background sweep task
    let sweep_handle = spawn_sweep_task(Arc::clone(&engine), config.sweep_interval_secs);
    info!("Background sweep task started");

    // Create router with the administrative endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweep_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(sweep_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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

    // Abort the sweep task
    sweep_handle.abort();
    warn!("Sweep task aborted");
}
