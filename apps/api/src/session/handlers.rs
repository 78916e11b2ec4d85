use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{ApiJson, AppError};
use crate::session::{CurrentSession, MaybeSession, Role, Session, SessionState};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub state: SessionState,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub has_api_key: bool,
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl SessionResponse {
    fn logged_out(has_configured_key: bool) -> Self {
        Self {
            state: SessionState::LoggedOut,
            email: None,
            role: None,
            has_api_key: has_configured_key,
            logged_in_at: None,
        }
    }

    fn from_session(session: &Session, has_configured_key: bool) -> Self {
        Self {
            state: session.state(),
            email: Some(session.email.clone()),
            role: session.role,
            has_api_key: session.api_key.is_some() || has_configured_key,
            logged_in_at: Some(session.created_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct ApiKeyRequest {
    #[serde(default)]
    pub api_key: String,
}

/// GET /api/v1/session
pub async fn handle_get_session(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> Json<SessionResponse> {
    let has_configured_key = state.config.gemini_api_key.is_some();
    Json(match session {
        Some(session) => SessionResponse::from_session(&session, has_configured_key),
        None => SessionResponse::logged_out(has_configured_key),
    })
}

/// PUT /api/v1/session/role
pub async fn handle_select_role(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ApiJson(request): ApiJson<SelectRoleRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let updated = state
        .sessions
        .update(session.id, |s| s.select_role(request.role))
        .await
        .ok_or(AppError::Unauthorized)?;

    info!(email = %updated.email, role = ?request.role, "Role selected");
    Ok(Json(SessionResponse::from_session(
        &updated,
        state.config.gemini_api_key.is_some(),
    )))
}

/// PUT /api/v1/session/api-key
///
/// Holds the key in this session only; it is never persisted or logged.
pub async fn handle_save_api_key(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ApiJson(request): ApiJson<ApiKeyRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let api_key = request.api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(AppError::Validation(
            "Please enter a valid API key.".to_string(),
        ));
    }

    let updated = state
        .sessions
        .update(session.id, |s| s.api_key = Some(api_key))
        .await
        .ok_or(AppError::Unauthorized)?;

    info!(email = %updated.email, "Session API key saved");
    Ok(Json(SessionResponse::from_session(
        &updated,
        state.config.gemini_api_key.is_some(),
    )))
}

/// DELETE /api/v1/session
pub async fn handle_logout(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> StatusCode {
    state.sessions.remove(session.id).await;
    info!(email = %session.email, "Session discarded");
    StatusCode::NO_CONTENT
}
