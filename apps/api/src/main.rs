mod auth;
mod config;
mod errors;
mod extraction;
mod generation;
mod jobs;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::HttpAiGateway;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::RecordStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JD Optimizer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize flat-file record store
    let store = RecordStore::open(&config.data_dir);
    store.init().await?;

    // Initialize AI gateway client
    let gateway = HttpAiGateway::new(&config.ai_api_url, config.ai_api_key.clone())?;
    info!("AI gateway client initialized (endpoint: {})", gateway.endpoint());

    let state = AppState {
        config: config.clone(),
        gateway: Arc::new(gateway),
        store: Arc::new(store),
    };

    // Browser client is served from a different origin
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
