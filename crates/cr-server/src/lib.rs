//! cr-server: HTTP front end for the extraction gateway.
//!
//! - Axum router with API-key authentication and request IDs
//! - In-memory result cache for successful resolutions
//! - Graceful shutdown via signal handling

pub mod cache;
pub mod context;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use cr_core::config::Config;
use cr_extract::tools::{ToolRegistry, YT_DLP};
use cr_extract::{ExtractionGateway, Extractor, YtDlp};
pub use tokio_util::sync::CancellationToken;

use crate::context::AppContext;

/// Build the production extractor from configuration.
///
/// Falls back to the bare executable name when yt-dlp was not discovered,
/// so a later install is picked up without a restart.
pub async fn build_extractor(config: &Config) -> Arc<dyn Extractor> {
    let tools = ToolRegistry::discover(&config.extractor);
    for info in tools.check_all().await {
        if info.available {
            tracing::info!(
                "Tool found: {} ({})",
                info.name,
                info.version.as_deref().unwrap_or("unknown version")
            );
        } else {
            tracing::warn!("Tool not found: {}; extractions will fail", info.name);
        }
    }

    let binary = tools
        .require(YT_DLP)
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|_| YT_DLP.into());

    Arc::new(YtDlp::new(
        binary,
        Duration::from_secs(config.extractor.process_timeout_secs),
    ))
}

/// Start the clipresolve server.
///
/// Generates the platform cookie jars, binds the listener and serves until a
/// shutdown signal arrives or `cancel` is triggered.
pub async fn start(config: Config, cancel: CancellationToken) -> cr_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    if config.auth.api_key.as_deref().map_or(true, str::is_empty) {
        return Err(cr_core::Error::Validation(format!(
            "no API key configured; set auth.api_key or {}",
            cr_core::config::API_KEY_ENV
        )));
    }

    let extractor = build_extractor(&config).await;
    let gateway = ExtractionGateway::from_config(&config, extractor);
    gateway.prepare().await;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| cr_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let ctx = AppContext::new(config, gateway);
    let app = router::build_router(ctx);

    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| cr_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel))
        .await
        .map_err(|e| cr_core::Error::Internal(format!("Server error: {e}")))?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM) or cancellation.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
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
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
        _ = cancel.cancelled() => {}
    }

    tracing::info!("Shutdown signal received");
}
