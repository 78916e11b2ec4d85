pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::auth::handlers as auth;
use crate::employee::handlers as employee;
use crate::organization::handlers as organization;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/register", post(auth::handle_register))
        .route("/api/v1/auth/login", post(auth::handle_login))
        // Session / role
        .route(
            "/api/v1/session",
            get(session::handle_get_session).delete(session::handle_logout),
        )
        .route("/api/v1/session/role", put(session::handle_select_role))
        .route("/api/v1/session/api-key", put(session::handle_save_api_key))
        // Employee flow
        .route("/api/v1/employee/review", post(employee::handle_review))
        .route(
            "/api/v1/employee/match",
            post(employee::handle_percentage_match),
        )
        // Organization flow
        .route(
            "/api/v1/organization/job-description",
            post(organization::handle_generate_job_description),
        )
        // Résumé uploads are not size-capped.
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}
