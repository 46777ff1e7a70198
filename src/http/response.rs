//! Response mapping
//!
//! Translates engine errors into HTTP responses. Business outcomes map
//! to client-error statuses; load/persistence failures surface as 500s.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::EpochError;

impl EpochError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 409 Conflict
            EpochError::Conflict { .. } => StatusCode::CONFLICT,

            // 500 Internal Server Error
            EpochError::Io(_)
            | EpochError::MalformedRow(_)
            | EpochError::MalformedTimestamp(_)
            | EpochError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&EpochError> for ErrorResponse {
    fn from(err: &EpochError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for EpochError {
    fn into_response(self) -> Response {
        if !self.is_recoverable() {
            // After a persistence failure, memory and disk may have diverged
            tracing::error!("request failed: {}", self);
        }

        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
