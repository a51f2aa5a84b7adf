//! Login endpoint

use super::users::{LoginRequest, LoginResponse};
use crate::error::{ApiError, ErrorBody};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use tracing::debug;

/// User login endpoint
///
/// Exchange an email/password pair for a bearer token. A body that cannot be
/// read as a login request fails the same way as a wrong password.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    summary = "Log in",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub async fn login_user(
    State(app_state): State<AppState>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = request.map_err(|rejection| {
        debug!(reason = %rejection.body_text(), "Unreadable login body");
        ApiError::InvalidCredentials
    })?;

    let response = app_state.user_service.login(request).await?;
    Ok(Json(response))
}
