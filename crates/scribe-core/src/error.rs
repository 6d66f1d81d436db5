//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::validation::ValidationErrors;

/// Domain errors - business logic failures.
///
/// Policy denials are not errors; see [`crate::policy::Outcome`].
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Invalid reaction kind: {0:?}")]
    InvalidReactionKind(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Store(#[from] RepoError),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity_type, id }
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
