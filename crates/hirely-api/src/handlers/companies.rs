//! Company directory.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;

use hirely_models::Company;

use crate::auth::Session;
use crate::error::ApiResult;
use crate::forms::read_company_form;
use crate::state::AppState;

pub async fn list_companies(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<Company>>> {
    session.require_role()?;
    Ok(Json(state.company_records(&session).list().await?))
}

/// Create a company from a multipart form carrying its logo.
pub async fn create_company(
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Company>)> {
    session.require_recruiter()?;
    let (form, logo) = read_company_form(multipart).await?;
    let company = state.companies.create(&session, form, logo).await?;
    Ok((StatusCode::CREATED, Json(company)))
}
