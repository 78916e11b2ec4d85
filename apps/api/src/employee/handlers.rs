//! Axum route handlers for the résumé checker form.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::document::{prepare_document, DocumentError};
use crate::employee::ResumeCheck;
use crate::errors::AppError;
use crate::llm_client::PromptRequest;
use crate::models::output::ModelOutput;
use crate::session::{CurrentSession, Role, Session};
use crate::state::AppState;

/// Multipart field carrying the job description text.
pub const JOB_DESCRIPTION_FIELD: &str = "job_description";
/// Multipart field carrying the résumé PDF.
pub const RESUME_FIELD: &str = "resume";

#[derive(Debug, Default)]
struct ResumeSubmission {
    job_description: String,
    resume: Option<Bytes>,
}

/// POST /api/v1/employee/review
pub async fn handle_review(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    multipart: Multipart,
) -> Result<Json<ModelOutput>, AppError> {
    run_resume_check(&state, &session, multipart, ResumeCheck::Review).await
}

/// POST /api/v1/employee/match
pub async fn handle_percentage_match(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    multipart: Multipart,
) -> Result<Json<ModelOutput>, AppError> {
    run_resume_check(&state, &session, multipart, ResumeCheck::PercentageMatch).await
}

/// validate → preprocess → one model call. Nothing reaches the model unless a
/// résumé was uploaded and a key is available.
async fn run_resume_check(
    state: &AppState,
    session: &Session,
    multipart: Multipart,
    check: ResumeCheck,
) -> Result<Json<ModelOutput>, AppError> {
    session.require_role(Role::Employee)?;

    let submission = read_submission(multipart).await?;
    let resume = submission.resume.ok_or(DocumentError::MissingInput)?;
    let api_key = session.resolve_api_key(state.config.gemini_api_key.as_deref())?;

    let parts = prepare_document(Some(&resume[..]), state.rasterizer.as_ref()).await?;

    info!(
        email = %session.email,
        check = ?check,
        resume_bytes = resume.len(),
        "Running resume check"
    );

    let request = PromptRequest {
        instruction: check.prompt().to_string(),
        document: parts.into_iter().next(),
        context: submission.job_description,
    };
    let text = state.gateway.generate(api_key, &request).await?;

    Ok(Json(ModelOutput::new(check.title(), text)))
}

async fn read_submission(mut multipart: Multipart) -> Result<ResumeSubmission, AppError> {
    let mut submission = ResumeSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid form data: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(JOB_DESCRIPTION_FIELD) => {
                submission.job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid job description: {e}")))?;
            }
            Some(RESUME_FIELD) => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid resume upload: {e}")))?;
                if !data.is_empty() {
                    submission.resume = Some(data);
                }
            }
            _ => {}
        }
    }

    Ok(submission)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
    use base64::Engine;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::employee::prompts::{PERCENTAGE_MATCH_PROMPT, REVIEW_PROMPT};
    use crate::routes::build_router;
    use crate::session::SESSION_HEADER;
    use crate::test_support::{
        read_json, test_state, test_state_without_key, FakeRasterizer,
    };

    const BOUNDARY: &str = "resume-form-boundary";
    const JD: &str = "Senior Rust Engineer. 5+ years Rust, distributed systems.";

    fn multipart_body(job_description: &str, resume: Option<&[u8]>) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{JOB_DESCRIPTION_FIELD}\"\r\n\r\n{job_description}\r\n"
            )
            .as_bytes(),
        );
        if let Some(resume) = resume {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{RESUME_FIELD}\"; filename=\"resume.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(resume);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn submit(uri: &str, session_id: Uuid, body: Vec<u8>) -> Request<Body> {
        Request::post(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header(SESSION_HEADER, session_id.to_string())
            .body(Body::from(body))
            .unwrap()
    }

    async fn employee_session(state: &AppState) -> Uuid {
        let session = state.sessions.create("ada@example.com").await;
        state
            .sessions
            .update(session.id, |s| s.select_role(Role::Employee))
            .await
            .unwrap();
        session.id
    }

    #[tokio::test]
    async fn test_review_sends_prompt_image_and_job_description() {
        let (state, gateway, rasterizer) = test_state();
        let session_id = employee_session(&state).await;

        let response = build_router(state)
            .oneshot(submit(
                "/api/v1/employee/review",
                session_id,
                multipart_body(JD, Some(b"%PDF-1.4 resume".as_slice())),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["title"], "Gemini Evaluation");
        assert_eq!(body["text"], gateway.reply());

        assert_eq!(rasterizer.calls(), 1);
        assert_eq!(gateway.calls(), 1);
        let (api_key, request) = gateway.last_request().unwrap();
        assert_eq!(api_key, "test-key");
        assert_eq!(request.instruction, REVIEW_PROMPT);
        assert_eq!(request.context, JD);
        let document = request.document.unwrap();
        assert_eq!(document.mime_type, "image/jpeg");
        assert_eq!(
            BASE64_STANDARD.decode(document.data).unwrap(),
            FakeRasterizer::JPEG
        );
    }

    #[tokio::test]
    async fn test_match_uses_ats_prompt() {
        let (state, gateway, _) = test_state();
        let session_id = employee_session(&state).await;

        let response = build_router(state)
            .oneshot(submit(
                "/api/v1/employee/match",
                session_id,
                multipart_body(JD, Some(b"%PDF-1.4 resume".as_slice())),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["title"], "ATS Match Result");
        let (_, request) = gateway.last_request().unwrap();
        assert_eq!(request.instruction, PERCENTAGE_MATCH_PROMPT);
    }

    #[tokio::test]
    async fn test_missing_resume_makes_no_model_call() {
        for uri in ["/api/v1/employee/review", "/api/v1/employee/match"] {
            let (state, gateway, rasterizer) = test_state();
            let session_id = employee_session(&state).await;

            let response = build_router(state)
                .oneshot(submit(uri, session_id, multipart_body(JD, None)))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                read_json(response).await["error"]["message"],
                "Please upload the resume"
            );
            assert_eq!(gateway.calls(), 0);
            assert_eq!(rasterizer.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_empty_resume_counts_as_missing() {
        let (state, gateway, _) = test_state();
        let session_id = employee_session(&state).await;

        let response = build_router(state)
            .oneshot(submit(
                "/api/v1/employee/review",
                session_id,
                multipart_body(JD, Some(b"".as_slice())),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_api_key_makes_no_model_call() {
        let (state, gateway, rasterizer) = test_state_without_key();
        let session_id = employee_session(&state).await;

        let response = build_router(state)
            .oneshot(submit(
                "/api/v1/employee/review",
                session_id,
                multipart_body(JD, Some(b"%PDF-1.4 resume".as_slice())),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await["error"]["message"],
            "Please add your Gemini API key first from the sidebar."
        );
        assert_eq!(gateway.calls(), 0);
        assert_eq!(rasterizer.calls(), 0);
    }

    #[tokio::test]
    async fn test_session_key_is_used_when_no_key_configured() {
        let (state, gateway, _) = test_state_without_key();
        let session_id = employee_session(&state).await;
        state
            .sessions
            .update(session_id, |s| s.api_key = Some("sidebar-key".to_string()))
            .await
            .unwrap();

        let response = build_router(state)
            .oneshot(submit(
                "/api/v1/employee/review",
                session_id,
                multipart_body(JD, Some(b"%PDF-1.4 resume".as_slice())),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(gateway.last_request().unwrap().0, "sidebar-key");
    }

    #[tokio::test]
    async fn test_organization_role_cannot_use_employee_form() {
        let (state, gateway, _) = test_state();
        let session = state.sessions.create("org@example.com").await;
        state
            .sessions
            .update(session.id, |s| s.select_role(Role::Organization))
            .await
            .unwrap();

        let response = build_router(state)
            .oneshot(submit(
                "/api/v1/employee/review",
                session.id,
                multipart_body(JD, Some(b"%PDF-1.4 resume".as_slice())),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_render_failure_is_unprocessable() {
        let (state, gateway, _) = test_state();
        let state = AppState {
            rasterizer: std::sync::Arc::new(FakeRasterizer::failing()),
            ..state
        };
        let session_id = employee_session(&state).await;

        let response = build_router(state)
            .oneshot(submit(
                "/api/v1/employee/review",
                session_id,
                multipart_body(JD, Some(b"not really a pdf".as_slice())),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(gateway.calls(), 0);
    }
}
