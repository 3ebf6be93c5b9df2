// Entrant Registry - Web Server
// REST API over the in-memory entrant store with Axum

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;

use entrant_registry::config::ServerConfig;
use entrant_registry::http::router;
use entrant_registry::telemetry::init_tracing;
use entrant_registry::{default_seed, EntrantHandler, InMemoryEntrantStore};

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let config = ServerConfig::parse();

    init_tracing(&config.log_filter)?;

    let store = if config.no_seed {
        InMemoryEntrantStore::new()
    } else {
        InMemoryEntrantStore::with_records(default_seed()).context("failed to seed entrant store")?
    };

    let app = router(EntrantHandler::new(Arc::new(store)));

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    tracing::info!(
        %addr,
        version = entrant_registry::VERSION,
        seeded = !config.no_seed,
        "Entrant server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server shut down successfully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        _ = terminate => tracing::info!("Received SIGTERM signal"),
    }
}
