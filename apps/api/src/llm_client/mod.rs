//! LLM Client: the single point of entry for all Gemini API calls.
//!
//! No other module may call the Gemini API directly. Handlers depend on the
//! `ModelGateway` trait so the backend can be swapped (or counted in tests).
//!
//! Each call is one request: no retry, no client-side timeout. The model's text is
//! returned verbatim.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::document::DocumentPart;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One model invocation: instruction first, then the optional page image, then the
/// free-text context.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub instruction: String,
    pub document: Option<DocumentPart>,
    pub context: String,
}

impl PromptRequest {
    pub fn text(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            document: None,
            context: String::new(),
        }
    }
}

#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn generate(&self, api_key: &str, request: &PromptRequest) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: &'a DocumentPart,
    },
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl<'a> GenerateContentRequest<'a> {
    /// Builds the ordered part list. Empty text parts are skipped; the API rejects them.
    fn from_prompt(request: &'a PromptRequest) -> Self {
        let mut parts = Vec::with_capacity(3);
        if !request.instruction.trim().is_empty() {
            parts.push(Part::Text {
                text: &request.instruction,
            });
        }
        if let Some(document) = &request.document {
            parts.push(Part::InlineData {
                inline_data: document,
            });
        }
        if !request.context.trim().is_empty() {
            parts.push(Part::Text {
                text: &request.context,
            });
        }

        Self {
            contents: vec![Content {
                role: "user",
                parts,
            }],
        }
    }
}

impl GenerateContentResponse {
    /// Text of the first candidate, concatenated across its text parts.
    fn into_text(self) -> Option<String> {
        let candidate = self.candidates?.into_iter().next()?;
        let texts: Vec<String> = candidate
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini client
// ────────────────────────────────────────────────────────────────────────────

/// `ModelGateway` over the Gemini `generateContent` REST endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ModelGateway for GeminiClient {
    async fn generate(&self, api_key: &str, request: &PromptRequest) -> Result<String, LlmError> {
        let body = GenerateContentRequest::from_prompt(request);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed.into_text().ok_or(LlmError::EmptyContent)?;

        debug!(
            "Gemini call succeeded: model={}, with_document={}, response_chars={}",
            self.model,
            request.document.is_some(),
            text.len()
        );

        Ok(text)
    }
}
