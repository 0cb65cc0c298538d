use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// Non-success response from the helpdesk API
    #[error("Upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },
    /// The request never produced a response (connection refused, DNS, TLS, ...)
    #[error("Transport error: {0}")]
    Transport(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
