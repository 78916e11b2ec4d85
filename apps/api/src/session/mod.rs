//! Per-user session state: who is logged in, which role they picked, and an optional
//! session-local Gemini key.
//!
//! State machine:
//!
//! ```text
//! LoggedOut ──login/register──▶ LoggedInNoRole ──pick role──▶ LoggedInEmployee
//!                                                         └──▶ LoggedInOrganization
//! ```
//!
//! Picking a role again overwrites the previous one. A session that has been discarded
//! (or never existed) reports `LoggedOut`.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// Header carrying the session id returned by login/registration.
pub const SESSION_HEADER: &str = "x-session-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Employee,
    Organization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    LoggedOut,
    LoggedInNoRole,
    LoggedInEmployee,
    LoggedInOrganization,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub email: String,
    pub role: Option<Role>,
    pub api_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// A freshly authenticated session, no role selected yet.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            role: None,
            api_key: None,
            created_at: Utc::now(),
        }
    }

    pub fn state(&self) -> SessionState {
        match self.role {
            None => SessionState::LoggedInNoRole,
            Some(Role::Employee) => SessionState::LoggedInEmployee,
            Some(Role::Organization) => SessionState::LoggedInOrganization,
        }
    }

    pub fn select_role(&mut self, role: Role) {
        self.role = Some(role);
    }

    /// Fails unless the session's active role is `role`.
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == Some(role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Select the {role:?} role to use this form"
            )))
        }
    }

    /// The session's own key wins over the runtime-configured one.
    pub fn resolve_api_key<'a>(&'a self, configured: Option<&'a str>) -> Result<&'a str, AppError> {
        self.api_key.as_deref().or(configured).ok_or_else(|| {
            AppError::Validation(
                "Please add your Gemini API key first from the sidebar.".to_string(),
            )
        })
    }
}

/// Process-local session table shared by all handlers.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh session for `email`, replacing any earlier one for the same
    /// user. The table holds at most one session per registered email.
    pub async fn create(&self, email: &str) -> Session {
        let session = Session::new(email);
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, existing| existing.email != email);
        sessions.insert(session.id, session.clone());
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Session> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Applies `f` to the stored session and returns the updated copy.
    pub async fn update<F>(&self, id: Uuid, f: F) -> Option<Session>
    where
        F: FnOnce(&mut Session),
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        f(session);
        Some(session.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Option<Session> {
        self.sessions.write().await.remove(&id)
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Extractor resolving the `x-session-id` header to a live session.
/// Rejects with 401 when the header is missing, malformed or unknown.
pub struct CurrentSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = session_id_from_parts(parts).ok_or(AppError::Unauthorized)?;
        let session = state.sessions.get(id).await.ok_or(AppError::Unauthorized)?;
        Ok(CurrentSession(session))
    }
}

/// Like `CurrentSession` but never rejects; `None` means logged out.
pub struct MaybeSession(pub Option<Session>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = match session_id_from_parts(parts) {
            Some(id) => state.sessions.get(id).await,
            None => None,
        };
        Ok(MaybeSession(session))
    }
}

fn session_id_from_parts(parts: &Parts) -> Option<Uuid> {
    parts
        .headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
}
