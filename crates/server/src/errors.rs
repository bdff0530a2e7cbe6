use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use service::student::StudentError;

/// JSON error body: `{"error": <title>, "message": <detail>, "code": <n>, "details": [...]}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: Option<String>,
    pub code: Option<u16>,
    pub details: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a serde_json::Value>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, message: Option<String>) -> Self {
        Self { status, error, message, code: None, details: None }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", Some(message.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.error,
            message: self.message.as_deref(),
            code: self.code,
            details: self.details.as_ref(),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<StudentError> for JsonApiError {
    fn from(e: StudentError) -> Self {
        let code = Some(e.code());
        let message = Some(e.to_string());
        match e {
            StudentError::Validation(errs) => {
                debug!(err = %errs, "student validation failed");
                Self {
                    status: StatusCode::BAD_REQUEST,
                    error: "Validation Error",
                    message,
                    code,
                    details: serde_json::to_value(&errs).ok(),
                }
            }
            StudentError::Conflict(_) => Self { status: StatusCode::CONFLICT, error: "Conflict", message, code, details: None },
            StudentError::NotFound(_) => Self { status: StatusCode::NOT_FOUND, error: "Not Found", message, code, details: None },
            StudentError::StorageUnavailable(ref msg) => {
                error!(err = %msg, "student store unavailable");
                Self { status: StatusCode::SERVICE_UNAVAILABLE, error: "Storage Unavailable", message, code, details: None }
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
}
