//! Term Translate - Batch term translation over Amazon Bedrock
//!
//! Serves `POST /api/v1/translate`.

use anyhow::{Context, Result};
use std::sync::Arc;
use term_translate::api::{self, AppState};
use term_translate::config::{Config, LogFormat};
use term_translate::services::{BedrockClient, TranslatorService};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let loaded_env = std::path::Path::new(".env").exists();
    if loaded_env {
        dotenvy::dotenv()?;
    }

    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    init_tracing(config.logging.format);

    info!("Term Translate starting...");
    if loaded_env {
        info!("Loaded environment variables from .env file");
    }
    info!("Bedrock region: {}", config.bedrock.region);
    info!("Bedrock model: {}", config.bedrock.model_id);

    // Build the Bedrock client once; every request shares it
    let client = BedrockClient::from_env(&config.bedrock)
        .await
        .context("Failed to initialize Bedrock client")?;
    let translator = TranslatorService::new(Arc::new(client));

    api::serve(&config.server, AppState::new(translator)).await?;

    info!("Term Translate shutting down");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
