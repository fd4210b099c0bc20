//! Job listing, posting and management handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use hirely_models::{Application, Job, JobAnalytics, JobFilter, JobId, NewJob, UserRole};

use crate::auth::Session;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Fetch a job and check the session owns it.
pub(crate) async fn owned_job(state: &AppState, session: &Session, job_id: &JobId) -> ApiResult<Job> {
    session.require_recruiter()?;

    let job = state
        .jobs(session)
        .get(job_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Job {} not found", job_id)))?;

    if !job.is_owned_by(&session.user_id) {
        return Err(ApiError::forbidden("Only the recruiter who posted this job can manage it"));
    }
    Ok(job)
}

/// List jobs matching the optional location, company and title filters.
pub async fn list_jobs(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<JobFilter>,
) -> ApiResult<Json<Vec<Job>>> {
    session.require_role()?;
    let jobs = state.jobs(&session).list(&filter).await?;
    Ok(Json(jobs))
}

pub async fn create_job(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<NewJob>,
) -> ApiResult<(StatusCode, Json<Job>)> {
    session.require_recruiter()?;

    let insert = payload.into_insert(&session.user_id)?;
    let job = state.jobs(&session).create(&insert).await?;

    info!(job_id = %job.id, recruiter_id = %session.user_id, "Job posted");
    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn get_job(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<String>,
) -> ApiResult<Json<Job>> {
    session.require_role()?;
    let job_id = JobId::parse(job_id)?;

    state
        .jobs(&session)
        .get(&job_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Job {} not found", job_id)))
}

pub async fn delete_job(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<String>,
) -> ApiResult<Json<Vec<Job>>> {
    let job_id = JobId::parse(job_id)?;
    owned_job(&state, &session, &job_id).await?;

    let deleted = state.jobs(&session).delete(&job_id).await?;
    info!(job_id = %job_id, rows = deleted.len(), "Job deleted");
    Ok(Json(deleted))
}

#[derive(Debug, Deserialize)]
pub struct HiringStatusRequest {
    #[serde(alias = "isOpen")]
    pub is_open: bool,
}

pub async fn update_hiring_status(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<String>,
    Json(payload): Json<HiringStatusRequest>,
) -> ApiResult<Json<Vec<Job>>> {
    let job_id = JobId::parse(job_id)?;
    owned_job(&state, &session, &job_id).await?;

    let updated = state
        .jobs(&session)
        .update_hiring_status(&job_id, payload.is_open)
        .await?;
    info!(job_id = %job_id, is_open = payload.is_open, "Hiring status updated");
    Ok(Json(updated))
}

pub async fn job_analytics(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobAnalytics>> {
    let job_id = JobId::parse(job_id)?;
    owned_job(&state, &session, &job_id).await?;

    let applications = state
        .application_records(&session)
        .list_for_job(&job_id)
        .await?;
    Ok(Json(JobAnalytics::from_applications(&applications)))
}

/// Recruiters see the jobs they posted; candidates see their applications.
#[derive(Debug, Serialize)]
#[serde(tag = "role", content = "items", rename_all = "snake_case")]
pub enum MyJobsResponse {
    Recruiter(Vec<Job>),
    Candidate(Vec<Application>),
}

pub async fn my_jobs(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<MyJobsResponse>> {
    let response = match session.require_role()? {
        UserRole::Recruiter => MyJobsResponse::Recruiter(
            state.jobs(&session).list_by_recruiter(&session.user_id).await?,
        ),
        UserRole::Candidate => MyJobsResponse::Candidate(
            state
                .application_records(&session)
                .list_for_candidate(&session.user_id)
                .await?,
        ),
    };
    Ok(Json(response))
}
