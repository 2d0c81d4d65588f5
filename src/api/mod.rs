//! HTTP API: a single translation route

pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod validation;

use crate::config::ServerConfig;
use crate::services::TranslatorService;
use anyhow::{Context, Result};
use axum::{routing::post, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::{AppError, ErrorResponse};

pub const TRANSLATE_PATH: &str = "/api/v1/translate";

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<TranslatorService>,
}

impl AppState {
    pub fn new(translator: TranslatorService) -> Self {
        Self {
            translator: Arc::new(translator),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(TRANSLATE_PATH, post(handlers::translate))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(logging::RequestSpan)
                .on_response(logging::RecordStatus),
        )
        .with_state(state)
}

/// Bind and serve until Ctrl+C
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind translation API to {}", addr))?;

    info!("Translation API listening on {}", addr);

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
