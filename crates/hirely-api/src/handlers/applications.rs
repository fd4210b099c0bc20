//! Application submission and review.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use hirely_models::{Application, ApplicationId, ApplicationStatus, JobId};

use crate::auth::Session;
use crate::error::{ApiError, ApiResult};
use crate::forms::read_application_form;
use crate::handlers::jobs::owned_job;
use crate::state::AppState;

/// Apply to a job with a multipart form carrying the resume.
pub async fn apply_to_job(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<String>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Application>)> {
    session.require_candidate()?;
    let job_id = JobId::parse(job_id)?;
    let (form, resume) = read_application_form(multipart).await?;

    let application = state
        .applications
        .apply(&session, job_id, form, resume)
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: ApplicationStatus,
}

/// Move an application through review. Only the recruiter who owns the job may.
pub async fn update_application_status(
    State(state): State<AppState>,
    session: Session,
    Path(application_id): Path<String>,
    Json(payload): Json<StatusRequest>,
) -> ApiResult<Json<Application>> {
    session.require_recruiter()?;
    let application_id = ApplicationId::parse(application_id)?;

    let records = state.application_records(&session);
    let current = records
        .get(&application_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Application {} not found", application_id)))?;
    owned_job(&state, &session, &current.job_id).await?;

    let application = records.update_status(&application_id, payload.status).await?;
    info!(
        application_id = %application_id,
        status = %application.status,
        "Application status updated"
    );
    Ok(Json(application))
}
