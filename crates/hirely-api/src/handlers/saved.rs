//! Saved-job bookmarks.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use hirely_models::{JobId, SaveOutcome, SavedJob};

use crate::auth::Session;
use crate::error::ApiResult;
use crate::state::AppState;

/// Flip the bookmark for a job.
pub async fn toggle_saved(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<String>,
) -> ApiResult<Json<SaveOutcome>> {
    session.require_candidate()?;
    let job_id = JobId::parse(job_id)?;
    Ok(Json(state.saved_jobs(&session).toggle(&job_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct SetSavedRequest {
    pub saved: bool,
}

/// Put the bookmark into an explicit state. Repeating the call is harmless.
pub async fn set_saved(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<String>,
    Json(payload): Json<SetSavedRequest>,
) -> ApiResult<Json<SaveOutcome>> {
    session.require_candidate()?;
    let job_id = JobId::parse(job_id)?;
    Ok(Json(
        state
            .saved_jobs(&session)
            .set_saved(&job_id, payload.saved)
            .await?,
    ))
}

pub async fn list_saved(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<SavedJob>>> {
    session.require_role()?;
    Ok(Json(state.saved_jobs(&session).list().await?))
}
