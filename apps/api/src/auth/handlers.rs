//! Axum route handlers for login and registration.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{ApiJson, AppError};
use crate::session::{Session, SessionState};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub session_id: Uuid,
    pub email: String,
    pub state: SessionState,
    pub message: String,
}

impl AuthResponse {
    fn new(session: &Session, message: &str) -> Self {
        Self {
            session_id: session.id,
            email: session.email.clone(),
            state: session.state(),
            message: message.to_string(),
        }
    }
}

/// POST /api/v1/auth/register
///
/// Creates the account and logs it in. Nothing is created when any check fails.
pub async fn handle_register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    if request.password != request.confirm_password {
        return Err(AppError::Validation("Passwords do not match!".to_string()));
    }
    if request.email.is_empty() || request.password.is_empty() {
        return Err(AppError::Validation("Please fill in all fields!".to_string()));
    }

    if let Err(e) = state
        .credentials
        .register(&request.email, &request.password)
        .await
    {
        warn!(email = %request.email, "Registration rejected: {e}");
        return Err(e.into());
    }

    let session = state.sessions.create(&request.email).await;
    info!(email = %session.email, session_id = %session.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new(&session, "Registration successful!")),
    ))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if request.email.is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "Please fill in both fields!".to_string(),
        ));
    }

    if let Err(e) = state
        .credentials
        .verify(&request.email, &request.password)
        .await
    {
        warn!(email = %request.email, "Login rejected: {e}");
        return Err(e.into());
    }

    let session = state.sessions.create(&request.email).await;
    info!(email = %session.email, session_id = %session.id, "User logged in");

    Ok(Json(AuthResponse::new(&session, "Login successful!")))
}
