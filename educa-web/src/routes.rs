//! Route definitions for the Educa web server

use crate::{auth, handlers, middleware::guard_middleware, openapi, AppState};
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

/// Routes that require a bearer token
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/cursos",
            get(handlers::list_courses).post(handlers::create_course),
        )
        .route(
            "/cursos/{id}",
            get(handlers::get_course)
                .put(handlers::update_course)
                .delete(handlers::delete_course),
        )
        .route(
            "/cursos/{id}/notas",
            get(handlers::list_grades).post(handlers::add_grade),
        )
        .route(
            "/cursos/{id}/galeria",
            get(handlers::list_photos).post(handlers::add_photo),
        )
        .route(
            "/cursos/{id}/anuncios",
            get(handlers::list_announcements).post(handlers::add_announcement),
        )
        .route_layer(from_fn_with_state(state, guard_middleware))
}

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Authentication
        .route("/auth/login", post(auth::handlers::login_user))
        .merge(protected_routes(state))
}

/// OpenAPI document
pub fn docs_routes() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi::serve_openapi))
}
