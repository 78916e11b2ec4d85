//! Axum route handler for the job description generator form.

use axum::{extract::State, Json};
use tracing::info;

use crate::errors::{ApiJson, AppError};
use crate::llm_client::PromptRequest;
use crate::models::output::ModelOutput;
use crate::organization::prompts::build_job_description_prompt;
use crate::organization::JobPostingForm;
use crate::session::{CurrentSession, Role};
use crate::state::AppState;

/// POST /api/v1/organization/job-description
///
/// Checks the key first, then that all six fields are filled, then makes one model call.
pub async fn handle_generate_job_description(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ApiJson(form): ApiJson<JobPostingForm>,
) -> Result<Json<ModelOutput>, AppError> {
    session.require_role(Role::Organization)?;
    let api_key = session.resolve_api_key(state.config.gemini_api_key.as_deref())?;

    if !form.is_complete() {
        return Err(AppError::Validation(
            "Please fill in all fields to generate the JD.".to_string(),
        ));
    }

    info!(
        email = %session.email,
        job_title = %form.job_title.trim(),
        company = %form.company_name.trim(),
        "Generating job description"
    );

    let request = PromptRequest::text(build_job_description_prompt(&form));
    let text = state.gateway.generate(api_key, &request).await?;

    Ok(Json(ModelOutput::new("Generated Job Description", text)))
}
