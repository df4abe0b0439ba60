//! Handler errors and the single mapping from outcomes to HTTP responses.

use super::protocol::{
    ErrorResponse, FieldIssue, MSG_INTERNAL_ERROR, MSG_NOT_FOUND, MSG_VALIDATION_ERROR,
};

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The body was readable but did not match the endpoint schema.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldIssue>),

    /// The body could not be decoded at all.
    #[error("malformed request body: {0}")]
    BadRequest(String),

    #[error("no such API route")]
    NotFound,

    /// Anything else. The cause is logged and never returned to the caller.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<Vec<FieldIssue>> for ApiError {
    fn from(issues: Vec<FieldIssue>) -> Self {
        ApiError::Validation(issues)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(issues) => {
                tracing::debug!("Rejected submission with {} issue(s)", issues.len());
                ErrorResponse {
                    message: MSG_VALIDATION_ERROR.to_string(),
                    errors: Some(issues),
                }
            }
            ApiError::BadRequest(message) => {
                tracing::debug!("Rejected unreadable body: {}", message);
                ErrorResponse {
                    message,
                    errors: None,
                }
            }
            ApiError::NotFound => ErrorResponse {
                message: MSG_NOT_FOUND.to_string(),
                errors: None,
            },
            ApiError::Internal(err) => {
                tracing::error!("Request failed: {:#}", err);
                ErrorResponse {
                    message: MSG_INTERNAL_ERROR.to_string(),
                    errors: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Maps a handler outcome to a response: the success status and body on
/// `Ok`, the error envelope otherwise.
pub fn reply<T: Serialize>(result: ApiResult<(StatusCode, T)>) -> Response {
    match result {
        Ok((status, body)) => (status, Json(body)).into_response(),
        Err(err) => err.into_response(),
    }
}
