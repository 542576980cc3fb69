mod analysis;
mod config;
mod contact;
mod errors;
mod llm_client;
mod routes;
mod state;
mod supabase;
mod upload;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::supabase::SupabaseClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeLens API v{}", env!("CARGO_PKG_VERSION"));

    if config.openrouter_api_key.is_none() {
        warn!("OPENROUTER_API_KEY is not set; analysis requests will fail with 503");
    }

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openrouter_api_key.clone(),
        config.openrouter_model.clone(),
    );
    info!("LLM client initialized (model: {})", config.openrouter_model);

    // Initialize Supabase client
    let store = SupabaseClient::new(
        config.supabase_url.clone(),
        config.supabase_service_key.clone(),
    );
    info!("Supabase client initialized");

    // Build app state
    let state = AppState {
        config: config.clone(),
        llm,
        store,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
