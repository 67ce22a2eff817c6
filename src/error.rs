//! Domain error types for the accessibility monitoring server.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::{HttpResponse, ResponseError};
use std::fmt;
use uuid::Uuid;

/// Reasons an operation cannot run in the current state of the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionFailure {
    /// A retest needs a completed initial test to snapshot.
    #[error("case {0} has no completed audit to retest")]
    NoCompletedAudit(Uuid),

    /// Only one live retest per case.
    #[error("case {0} already has an active retest")]
    RetestAlreadyExists(Uuid),

    /// Only one live audit per case.
    #[error("case {0} already has an active audit")]
    AuditAlreadyExists(Uuid),

    /// Protected delete: children must be removed first.
    #[error("{entity} {id} still has {count} active {children}")]
    HasActiveChildren {
        entity: &'static str,
        id: Uuid,
        count: u64,
        children: &'static str,
    },

    /// The record is not in a state that allows the operation.
    #[error("{0}")]
    InvalidState(String),
}

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Malformed input, reported inline on the originating form
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Stale `version` on write
    #[error("{0} has changed since you loaded it - please reload")]
    ConcurrentModification(String),

    /// Operation attempted in an invalid state
    #[error("Precondition failed: {0}")]
    Precondition(#[from] PreconditionFailure),

    /// Stored data violates an invariant the server maintains
    #[error("Integrity error: {0}")]
    Integrity(String),
}

impl AppError {
    /// Whether the caller can fix the request and resubmit. Anything else is
    /// a server fault and is logged when turned into a response.
    pub fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::NotFound(_)
                | AppError::Validation(_)
                | AppError::ConcurrentModification(_)
                | AppError::Precondition(_)
        )
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        if !self.is_user_recoverable() {
            tracing::error!(error = %self, "Request failed");
        }

        let (status, error_code, response_message) = match self {
            AppError::Database(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "An internal database error occurred".to_string(),
            ),
            AppError::Integrity(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "INTEGRITY_ERROR",
                "Stored data is inconsistent; the failure has been logged".to_string(),
            ),
            AppError::NotFound(_) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                self.to_string(),
            ),
            AppError::Validation(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                self.to_string(),
            ),
            AppError::ConcurrentModification(_) => (
                actix_web::http::StatusCode::CONFLICT,
                "CONCURRENT_MODIFICATION",
                self.to_string(),
            ),
            AppError::Precondition(_) => (
                actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
                "PRECONDITION_FAILED",
                self.to_string(),
            ),
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: error_code.to_string(),
            message: response_message,
        })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON parsing error: {}", err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
                AppError::Integrity(format!("duplicate row: {}", detail))
            }
            Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(detail)) => {
                AppError::Integrity(format!("orphaned reference: {}", detail))
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::Validation(format!("Invalid UUID: {}", err))
    }
}
