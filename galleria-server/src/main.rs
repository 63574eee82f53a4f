//! Galleria Server - REST API for image upload and hosting
//!
//! Exposes the image store via HTTP endpoints:
//! - POST /upload - Store an uploaded image and register its metadata
//! - GET /api/images - List registered images
//! - GET /uploads/{name} - Fetch a stored file

use std::net::SocketAddr;

use anyhow::Context;
use galleria_server::{create_router_with_config, AppState, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("galleria_server=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();

    // A missing or uncreatable upload directory is fatal at startup
    let state = AppState::from_config(&config)
        .await
        .with_context(|| format!("preparing upload directory {}", config.upload_dir.display()))?;

    let app = create_router_with_config(&config, state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!(
        %addr,
        base_url = %config.public_base_url,
        upload_dir = %config.upload_dir.display(),
        "Galleria server listening"
    );

    // Connect info is needed by the per-IP rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
