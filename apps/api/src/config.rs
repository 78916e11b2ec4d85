use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime-provided Gemini key. Sessions may still bring their own.
    pub gemini_api_key: Option<String>,
    /// Model identifier used by both the employee and organization flows.
    pub gemini_model: String,
    pub gemini_api_base_url: String,
    pub pdftoppm_path: String,
    pub pdf_render_dpi: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_api_base_url: optional_env("GEMINI_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            pdftoppm_path: optional_env("PDFTOPPM_PATH").unwrap_or_else(|| "pdftoppm".to_string()),
            pdf_render_dpi: std::env::var("PDF_RENDER_DPI")
                .unwrap_or_else(|_| "200".to_string())
                .parse::<u32>()
                .context("PDF_RENDER_DPI must be a positive integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an env var, treating unset and blank the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
