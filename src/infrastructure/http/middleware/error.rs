use crate::application::services::rule_form::{FormError, ValidationErrors};
use crate::domain::errors::DomainError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Forbidden(String),
    Internal(String),
    Conflict(String),
    /// Draft failed client-side validation; carries the inline errors
    Unprocessable(ValidationErrors),
    /// The helpdesk API could not be reached or failed
    BadGateway(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Unprocessable(errors) => {
                write!(f, "Validation failed with {} error(s)", errors.len())
            }
            ApiError::BadGateway(msg) => write!(f, "Bad gateway: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Unprocessable(errors) => {
                let body = Json(json!({
                    "error": "Validation failed",
                    "errors": errors
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// Convert from domain errors
impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::ValidationError(msg) => ApiError::BadRequest(msg),
            DomainError::Conflict(msg) => ApiError::Conflict(msg),
            DomainError::Forbidden(msg) => ApiError::Forbidden(msg),
            DomainError::Internal(msg) => ApiError::Internal(msg),
            DomainError::Upstream { status, message } => {
                ApiError::BadGateway(format!("Helpdesk API returned {}: {}", status, message))
            }
            DomainError::Transport(msg) => {
                ApiError::BadGateway(format!("Helpdesk API unreachable: {}", msg))
            }
        }
    }
}

// Convert from rule form errors
impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Validation(errors) => ApiError::Unprocessable(errors),
            FormError::Submission(e) => ApiError::from(e),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
