//! Recommendation chat server
//!
//! Serves a single chat page and forwards each message to Gemini, keeping
//! one in-memory transcript per connected browser tab.

mod api;
mod config;
mod llm;
mod markdown;
mod session;

use api::{create_router, create_setup_error_router, AppState};
use config::AppConfig;
use llm::{GeminiService, LlmService, LoggingService};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reco_chat=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    // Without a key only the error page is served
    let router = match config.require_api_key() {
        Ok(api_key) => {
            let gemini = GeminiService::new(
                api_key,
                &config.model,
                &config.base_url,
                config.request_timeout,
            )?;
            let service: Arc<dyn LlmService> = Arc::new(LoggingService::new(Arc::new(gemini)));
            tracing::info!(model = %config.model, base_url = %config.base_url, "Gemini client configured");

            create_router(AppState::new(service))
        }
        Err(e) => {
            tracing::error!(error = %e, "Serving setup error page");
            eprintln!("❌ {e}");
            create_setup_error_router(&e.to_string())
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Default predicate leaves text/event-stream alone
    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = router
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!("Recommendation chat listening on {}", config.listen_addr);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
