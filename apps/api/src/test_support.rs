//! Fakes shared by handler tests: a recording model gateway and a canned rasterizer.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::auth::InMemoryCredentialStore;
use crate::config::Config;
use crate::document::render::{PageRasterizer, RenderError};
use crate::llm_client::{LlmError, ModelGateway, PromptRequest};
use crate::session::SessionStore;
use crate::state::AppState;

/// Records every call and answers with a fixed reply.
#[derive(Default)]
pub struct RecordingGateway {
    requests: Mutex<Vec<(String, PromptRequest)>>,
    fail_next: AtomicBool,
}

impl RecordingGateway {
    pub fn reply(&self) -> String {
        "**Match: 82%**\nMissing keywords: Kafka".to_string()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<(String, PromptRequest)> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ModelGateway for RecordingGateway {
    async fn generate(&self, api_key: &str, request: &PromptRequest) -> Result<String, LlmError> {
        self.requests
            .lock()
            .unwrap()
            .push((api_key.to_string(), request.clone()));
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(LlmError::Api {
                status: 403,
                message: "API key not valid.".to_string(),
            });
        }
        Ok(self.reply())
    }
}

/// Returns a fixed JPEG without touching poppler.
#[derive(Default)]
pub struct FakeRasterizer {
    calls: AtomicUsize,
    fail: bool,
}

impl FakeRasterizer {
    pub const JPEG: &'static [u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0xFF, 0xD9];

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageRasterizer for FakeRasterizer {
    async fn first_page_jpeg(&self, _pdf_bytes: &[u8]) -> Result<Vec<u8>, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RenderError::Tool {
                status: "exit status: 1".to_string(),
                stderr: "Syntax Error: Couldn't find trailer dictionary".to_string(),
            });
        }
        Ok(Self::JPEG.to_vec())
    }
}

pub fn test_config(api_key: Option<&str>) -> Config {
    Config {
        gemini_api_key: api_key.map(str::to_string),
        gemini_model: "gemini-test".to_string(),
        gemini_api_base_url: "http://127.0.0.1:9".to_string(),
        pdftoppm_path: "pdftoppm".to_string(),
        pdf_render_dpi: 72,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

fn build_state(config: Config) -> (AppState, Arc<RecordingGateway>, Arc<FakeRasterizer>) {
    let gateway = Arc::new(RecordingGateway::default());
    let rasterizer = Arc::new(FakeRasterizer::default());
    let state = AppState {
        config,
        credentials: Arc::new(InMemoryCredentialStore::new()),
        sessions: SessionStore::new(),
        gateway: gateway.clone(),
        rasterizer: rasterizer.clone(),
    };
    (state, gateway, rasterizer)
}

/// State with a runtime-configured key (`test-key`).
pub fn test_state() -> (AppState, Arc<RecordingGateway>, Arc<FakeRasterizer>) {
    build_state(test_config(Some("test-key")))
}

/// State with no configured key; sessions must bring their own.
pub fn test_state_without_key() -> (AppState, Arc<RecordingGateway>, Arc<FakeRasterizer>) {
    build_state(test_config(None))
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
