mod auth;
mod config;
mod document;
mod employee;
mod errors;
mod llm_client;
mod models;
mod organization;
mod routes;
mod session;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::InMemoryCredentialStore;
use crate::config::Config;
use crate::document::render::PdftoppmRasterizer;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS API v{}", env!("CARGO_PKG_VERSION"));

    let gateway = GeminiClient::new(&config.gemini_api_base_url, &config.gemini_model);
    info!("Gemini client initialized (model: {})", gateway.model());
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set; each session must save its own key");
    }

    let rasterizer = PdftoppmRasterizer::new(config.pdftoppm_path.clone(), config.pdf_render_dpi);
    info!(
        "PDF rasterizer: {} at {} dpi",
        rasterizer.executable_path, rasterizer.dpi
    );

    let state = AppState {
        config: config.clone(),
        credentials: Arc::new(InMemoryCredentialStore::new()),
        sessions: SessionStore::new(),
        gateway: Arc::new(gateway),
        rasterizer: Arc::new(rasterizer),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
