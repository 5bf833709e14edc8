//! HTTP server for meeting-digest
//!
//! Exposes `POST /api/summarize` for the chat UI and `GET /health`.

pub mod error;
pub mod handlers;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Settings;
use crate::llm::{build_provider, PROMPT_VERSION};
use crate::pipeline::SummaryService;

pub use error::{ApiError, ErrorResponse};
pub use handlers::{create_router, AppState, HealthCheckResponse, SummaryResponse};

/// Build application state from settings.
///
/// Fails when the configuration is unusable, most notably a missing API key.
pub fn build_state(settings: &Settings) -> Result<AppState> {
    settings.validate()?;
    let provider = build_provider(settings)?;

    Ok(AppState {
        service: SummaryService::new(Arc::from(provider)),
        max_upload_bytes: settings.server.max_upload_bytes,
    })
}

/// Start the HTTP server and serve until Ctrl-C.
pub async fn start_server(settings: &Settings) -> Result<()> {
    let state = build_state(settings)?;

    info!("Starting meeting-digest {}", crate::VERSION);
    info!(
        "LLM: {} / {} (timeout {}s, retries {}, prompt v{})",
        settings.llm.provider,
        settings.llm.model,
        settings.llm.timeout_secs,
        settings.llm.max_retries,
        PROMPT_VERSION
    );
    info!("Upload limit: {} bytes", settings.server.max_upload_bytes);

    let mut app = create_router(state).layer(TraceLayer::new_for_http());
    if settings.server.cors_allow_any_origin {
        app = app.layer(CorsLayer::permissive());
    }

    let addr = settings.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
