//! HTTP error mapping
//!
//! Every failure leaving a handler or the guard is an [`ApiError`]. Internal
//! detail is logged here and never serialised into the response body.

use crate::auth::AuthError;
use crate::middleware::GuardError;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use educa_applications::CourseError;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use utoipa::ToSchema;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Credenciales incorrectas";
pub const UNAUTHORIZED_MESSAGE: &str = "No autorizado";

/// JSON error body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "not_found")]
    pub error: String,
    #[schema(example = "curso 1 not found")]
    pub message: String,
    /// Offending field for validation errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl ErrorBody {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            field: None,
            resource: None,
            id: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed: {message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unauthorized: {0}")]
    Unauthorized(#[from] GuardError),

    #[error("{resource} {id} not found")]
    NotFound { resource: String, id: i64 },

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::InvalidCredentials => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::Validation { field, message } => ErrorBody {
                field: field.clone(),
                ..ErrorBody::new("validation_error", message.clone())
            },
            Self::InvalidCredentials => {
                ErrorBody::new("invalid_credentials", INVALID_CREDENTIALS_MESSAGE)
            }
            Self::Unauthorized(_) => ErrorBody::new("unauthorized", UNAUTHORIZED_MESSAGE),
            Self::NotFound { resource, id } => ErrorBody {
                resource: Some(resource.clone()),
                id: Some(*id),
                ..ErrorBody::new("not_found", format!("{resource} {id} no encontrado"))
            },
            Self::ServiceUnavailable(_) => ErrorBody::new(
                "service_unavailable",
                "El servicio no está disponible, intente más tarde",
            ),
            Self::Internal(_) => ErrorBody::new("internal_error", "Error interno del servidor"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::ServiceUnavailable(detail) => {
                error!(error = %detail, "Storage collaborator failed")
            }
            Self::Internal(detail) => error!(error = %detail, "Internal error occurred"),
            Self::Unauthorized(reason) => debug!(%reason, "Request rejected by guard"),
            _ => {}
        }

        (self.status(), Json(self.body())).into_response()
    }
}

impl From<CourseError> for ApiError {
    fn from(e: CourseError) -> Self {
        match e {
            CourseError::NotFound { resource, id } => Self::NotFound {
                resource: resource.to_string(),
                id,
            },
            CourseError::Validation { field, message } => Self::Validation {
                field: Some(field),
                message,
            },
            CourseError::ServiceUnavailable(source) => {
                source.log();
                Self::ServiceUnavailable(source.to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        let field = match rejection {
            JsonRejection::JsonDataError(_) => data_error_field(&message),
            _ => None,
        };
        Self::Validation { field, message }
    }
}

/// Path of the offending field in a deserialization error such as
/// `"...target type: valor: invalid type: string \"95\", expected f64"`.
fn data_error_field(message: &str) -> Option<String> {
    let (_, detail) = message.split_once("target type: ")?;
    let (path, _) = detail.split_once(": ")?;
    let is_path = !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'));
    is_path.then(|| path.to_string())
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation {
            field: Some("id".to_string()),
            message: rejection.body_text(),
        }
    }
}

/// `axum::Json` whose rejection is a 400 [`ApiError`]
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` whose rejection is a 400 [`ApiError`]
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
