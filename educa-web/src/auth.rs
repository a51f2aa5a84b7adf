//! Authentication: token codec, user store and the login endpoint

pub mod handlers;
pub mod jwt;
pub mod users;

pub use jwt::{AuthError, Claims, TokenCodec, TokenError};
pub use users::{LoginRequest, LoginResponse, UserService, UserStore};

use crate::error::ApiError;
use axum::response::{IntoResponse, Response};

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
