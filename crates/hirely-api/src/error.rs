//! API error types.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use hirely_models::InputError;
use hirely_storage::StorageError;
use hirely_store::StoreError;

use crate::services::StagedWriteError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Signed in, but no role chosen yet.
    #[error("Choose a role to continue")]
    OnboardingRequired,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(#[from] InputError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The upload landed but the record referencing it was not written.
    #[error("Upload stored at {orphaned_key} but the record insert failed: {source}")]
    PartialWrite {
        orphaned_key: String,
        source: StoreError,
    },
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) | ApiError::OnboardingRequired => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(e) => store_status(e),
            ApiError::Internal(_) | ApiError::Storage(_) | ApiError::PartialWrite { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::OnboardingRequired => Some("onboarding_required"),
            ApiError::Validation(_) => Some("validation_failed"),
            ApiError::PartialWrite { .. } => Some("partial_write"),
            ApiError::Store(StoreError::RateLimited(_)) => Some("rate_limited"),
            _ => None,
        }
    }
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::AuthError(_) => StatusCode::UNAUTHORIZED,
        StoreError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::AlreadyExists(_) => StatusCode::CONFLICT,
        StoreError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        StoreError::ServerError(..) | StoreError::Network(_) | StoreError::InvalidResponse(_) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<StagedWriteError> for ApiError {
    fn from(err: StagedWriteError) -> Self {
        match err {
            StagedWriteError::Invalid(e) => ApiError::Validation(e),
            StagedWriteError::Upload(e) => ApiError::Storage(e),
            StagedWriteError::InsertFailed {
                orphaned_key,
                source,
            } => ApiError::PartialWrite {
                orphaned_key,
                source,
            },
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(status = status.as_u16(), "Request failed: {}", self);
        }

        // Don't expose internal error details in production
        let detail = if status.is_server_error()
            && std::env::var("ENVIRONMENT")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false)
        {
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let code = self.code();
        let fields = match self {
            ApiError::Validation(e) => Some(e.fields),
            _ => None,
        };

        let body = ErrorResponse {
            detail,
            code,
            fields,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error_lists_fields() {
        let (status, body) =
            body_json(InputError::field("resume", "Resume must be a PDF or Word document").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation_failed");
        assert_eq!(body["fields"]["resume"][0], "Resume must be a PDF or Word document");
    }

    #[tokio::test]
    async fn test_onboarding_required_code() {
        let (status, body) = body_json(ApiError::OnboardingRequired).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "onboarding_required");
    }

    #[test]
    fn test_store_error_statuses() {
        let cases = [
            (StoreError::AuthError("jwt expired".into()), StatusCode::UNAUTHORIZED),
            (StoreError::PermissionDenied("rls".into()), StatusCode::FORBIDDEN),
            (StoreError::not_found("job"), StatusCode::NOT_FOUND),
            (StoreError::AlreadyExists("dup".into()), StatusCode::CONFLICT),
            (StoreError::RateLimited(1000), StatusCode::TOO_MANY_REQUESTS),
            (StoreError::ServerError(503, "down".into()), StatusCode::BAD_GATEWAY),
            (StoreError::Unfiltered("delete"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status_code(), expected);
        }
    }

    #[tokio::test]
    async fn test_partial_write_reports_code() {
        let err = ApiError::from(StagedWriteError::InsertFailed {
            orphaned_key: "resume-12-user_1".into(),
            source: StoreError::ServerError(500, "boom".into()),
        });
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "partial_write");
    }
}
