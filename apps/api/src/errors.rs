use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::document::render::RenderError;
use crate::document::DocumentError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// `Json` extractor whose rejections render as `AppError` bodies.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Please log in first".to_string(),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            AppError::Auth(e) => match e {
                AuthError::Duplicate => (StatusCode::CONFLICT, "DUPLICATE", e.to_string()),
                AuthError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string()),
                AuthError::WrongCredential => {
                    (StatusCode::UNAUTHORIZED, "WRONG_CREDENTIAL", e.to_string())
                }
                AuthError::Hash(detail) => {
                    tracing::error!("Credential hashing error: {detail}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal server error occurred".to_string(),
                    )
                }
            },
            AppError::Document(DocumentError::MissingInput) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Please upload the resume".to_string(),
            ),
            AppError::Document(DocumentError::Render(e @ RenderError::ToolMissing(_))) => {
                tracing::error!("PDF renderer unavailable: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
            AppError::Document(e) => {
                tracing::warn!("Document error: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "DOCUMENT_ERROR",
                    e.to_string(),
                )
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (StatusCode::BAD_GATEWAY, "LLM_ERROR", e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
