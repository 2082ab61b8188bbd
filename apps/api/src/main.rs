mod activity;
mod config;
mod errors;
mod layout;
mod llm_client;
mod output;
mod persona;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::activity::reddit::RedditClient;
use crate::config::Config;
use crate::layout::default_canvas_config;
use crate::llm_client::GeminiClient;
use crate::output::OutputDir;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing credentials)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Persona API v{}", env!("CARGO_PKG_VERSION"));

    // Activity source (Reddit, app-only OAuth)
    let activity = Arc::new(RedditClient::new(&config));
    info!("Reddit client initialized (fetch limit: {})", config.fetch_limit);

    // Text generator
    let llm = Arc::new(GeminiClient::new(config.gemini_api_key.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Artifacts land here; created lazily on first write
    let output = OutputDir::new(config.output_dir.clone());
    info!("Writing personas to {}", output.root().display());

    let canvas = default_canvas_config();
    info!(
        "Persona sheet: {}px wide, min {}px tall, font {}",
        canvas.width,
        canvas.min_height,
        config.font_path.display()
    );

    let state = AppState {
        config: config.clone(),
        activity,
        llm,
        output,
        canvas,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
