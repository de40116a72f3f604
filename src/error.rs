use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::store::StoreError;
use crate::validation::ValidationError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Every failure a handler can report. The response bodies are fixed so that
/// nothing internal leaks to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("unauthorized")]
    Unauthorized,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniqueViolation => {
                ApiError::Validation(ValidationError("username already taken"))
            }
            StoreError::ConstraintViolation => {
                ApiError::Validation(ValidationError("integrity constraint violated"))
            }
            StoreError::Database(e) => ApiError::Internal(anyhow::Error::new(e)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::Validation(reason) => {
                warn!(%reason, "validation error");
                json!({ "errors": ["Validation errors"] })
            }
            ApiError::Unauthorized => json!({ "error": "Unauthorized" }),
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                json!({ "error": "Internal Server Error" })
            }
        };
        (status, Json(body)).into_response()
    }
}
