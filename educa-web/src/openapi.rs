//! OpenAPI specification for the Educa API

use axum::response::Json;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::auth::{LoginRequest, LoginResponse};
use crate::error::ErrorBody;
use crate::handlers::HealthResponse;
use educa_applications::{
    Announcement, Course, CourseInput, GalleryPhoto, Grade, MensajeGenerico, NewAnnouncement,
    NewGalleryPhoto, NewGrade,
};

/// Main OpenAPI specification for the Educa web server
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Educa API",
        version = "0.1.0",
        description = "Courses, grades, gallery and announcements behind bearer-token authentication",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        crate::handlers::health_check,
        crate::auth::handlers::login_user,

        crate::handlers::list_courses,
        crate::handlers::get_course,
        crate::handlers::create_course,
        crate::handlers::update_course,
        crate::handlers::delete_course,

        crate::handlers::list_grades,
        crate::handlers::add_grade,
        crate::handlers::list_photos,
        crate::handlers::add_photo,
        crate::handlers::list_announcements,
        crate::handlers::add_announcement,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBody,
            LoginRequest,
            LoginResponse,
            Course,
            CourseInput,
            MensajeGenerico,
            Grade,
            NewGrade,
            GalleryPhoto,
            NewGalleryPhoto,
            Announcement,
            NewAnnouncement,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Login and token issuance"),
        (name = "Cursos", description = "Course management"),
        (name = "Notas", description = "Grades of a course"),
        (name = "Galeria", description = "Photo gallery of a course"),
        (name = "Anuncios", description = "Announcements of a course"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Bearer token security scheme
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Get the OpenAPI specification as JSON
pub fn get_openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}

/// Get the OpenAPI specification as YAML
pub fn get_openapi_yaml() -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&ApiDoc::openapi())
}

/// `GET /api-docs/openapi.json`
pub async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
