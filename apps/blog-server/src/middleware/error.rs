//! Error handling - RFC 7807 problem responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use scribe_core::error::{DomainError, RepoError};
use scribe_core::ports::AuthError;
use scribe_core::validation::ValidationErrors;
use scribe_shared::{ErrorResponse, FieldProblem};

/// Application-level error type that converts to RFC 7807 responses.
///
/// Policy denials are not in here; handlers turn those into redirects.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    /// Login form rejected the credentials.
    Unauthorized(String),
    Conflict(String),
    Internal(String),
    Validation(ValidationErrors),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {}", errors),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized(detail) => ErrorResponse::unauthorized().with_detail(detail),
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict").with_detail(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Validation(errors) => ErrorResponse::new(422, "Validation Failed")
                .with_errors(
                    errors
                        .iter()
                        .map(|e| FieldProblem {
                            field: e.field.to_string(),
                            message: e.message.clone(),
                        })
                        .collect(),
                ),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            DomainError::Validation(errors) => AppError::Validation(errors),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::InvalidReactionKind(kind) => {
                AppError::BadRequest(format!("Unknown reaction type {kind:?}"))
            }
            DomainError::Internal(msg) => AppError::Internal(msg),
            DomainError::Store(err) => err.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("Invalid username or password".to_string())
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
