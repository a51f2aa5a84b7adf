//! Course-domain error types

use educa_core::EducaError;
use thiserror::Error;

/// Course operation result type
pub type CourseResult<T> = Result<T, CourseError>;

/// Failures of the Course Repository and the Nested Collection Managers
#[derive(Debug, Error)]
pub enum CourseError {
    /// Referenced resource does not exist
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    /// Missing or malformed input field
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// Persistence collaborator failed
    #[error("Storage unavailable: {0}")]
    ServiceUnavailable(#[from] EducaError),
}

impl CourseError {
    pub fn course_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: "curso",
            id,
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
