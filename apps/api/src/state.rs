use std::sync::Arc;

use crate::auth::CredentialStore;
use crate::config::Config;
use crate::document::render::PageRasterizer;
use crate::llm_client::ModelGateway;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable credential backend. Default: `InMemoryCredentialStore`.
    pub credentials: Arc<dyn CredentialStore>,
    pub sessions: SessionStore,
    /// The only path to the hosted model. Default: `GeminiClient`.
    pub gateway: Arc<dyn ModelGateway>,
    /// First-page PDF rasterizer. Default: `PdftoppmRasterizer`.
    pub rasterizer: Arc<dyn PageRasterizer>,
}
