//! Access guard evaluation for the web client.

use axum::extract::Query;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::Session;
use crate::error::{ApiError, ApiResult};
use crate::guard::{AppRoute, GuardDecision, SessionState};

#[derive(Debug, Deserialize)]
pub struct AccessQuery {
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub path: String,
    #[serde(flatten)]
    pub decision: GuardDecision,
}

/// Decide whether the caller may open a client page.
///
/// A missing or invalid bearer token counts as signed out.
pub async fn check_access(
    session: Option<Session>,
    Query(query): Query<AccessQuery>,
) -> ApiResult<Json<AccessResponse>> {
    let route = AppRoute::parse(&query.path)
        .ok_or_else(|| ApiError::not_found(format!("Unknown page {}", query.path)))?;

    let state = session
        .as_ref()
        .map(Session::state)
        .unwrap_or(SessionState::SignedOut);

    Ok(Json(AccessResponse {
        path: route.path(),
        decision: route.evaluate(state),
    }))
}
