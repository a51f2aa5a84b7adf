//! Educa Web Server
//!
//! HTTP surface of the course platform: login, course CRUD and the nested
//! notas/galeria/anuncios collections, all behind a bearer-token guard.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use error::ApiError;
pub use server::EducaServer;
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    Router,
};
use educa_applications::CourseError;
use educa_core::EducaError;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_credentials(true)
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .expose_headers([HeaderName::from_static(middleware::REQUEST_ID_HEADER)]);

    Router::new()
        // API routes
        .nest("/api", routes::api_routes(state.clone()))
        // API documentation
        .nest("/api-docs", routes::docs_routes())
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB max body size
        .with_state(state)
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] EducaError),

    #[error("Authentication setup failed: {0}")]
    Auth(#[from] auth::AuthError),

    #[error("Storage setup failed: {0}")]
    Storage(#[from] CourseError),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

/// Initialize logging for the web server from its configuration
pub fn init_logging(config: &educa_core::LoggingConfig) -> WebResult<()> {
    educa_core::init_logging(config)?;
    Ok(())
}
