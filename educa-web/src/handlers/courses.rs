//! Course CRUD handlers

use crate::error::{ApiError, ApiJson, ApiPath, ErrorBody};
use crate::middleware::AuthenticatedUser;
use crate::AppState;
use axum::{extract::State, response::Json};
use educa_applications::{Course, CourseInput, MensajeGenerico};
use tracing::info;

/// List all courses
#[utoipa::path(
    get,
    path = "/api/cursos",
    tag = "Cursos",
    summary = "List courses",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All courses in creation order", body = Vec<Course>),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn list_courses(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Course>>, ApiError> {
    Ok(Json(state.courses.list().await?))
}

/// Get one course
#[utoipa::path(
    get,
    path = "/api/cursos/{id}",
    tag = "Cursos",
    summary = "Get a course",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "The course", body = Course),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such course", body = ErrorBody)
    )
)]
pub async fn get_course(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Course>, ApiError> {
    Ok(Json(state.courses.get(id).await?))
}

/// Create a course
#[utoipa::path(
    post,
    path = "/api/cursos",
    tag = "Cursos",
    summary = "Create a course",
    security(("bearer_auth" = [])),
    request_body = CourseInput,
    responses(
        (status = 200, description = "Created course", body = Course),
        (status = 400, description = "Missing field or duplicate codigo", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn create_course(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(input): ApiJson<CourseInput>,
) -> Result<Json<Course>, ApiError> {
    let course = state.courses.create(input).await?;

    info!(
        event = "curso.created",
        user = user.subject.as_str(),
        request_id = %user.request_id,
        curso_id = course.id,
        "Course created"
    );
    Ok(Json(course))
}

/// Replace a course's nombre and codigo
#[utoipa::path(
    put,
    path = "/api/cursos/{id}",
    tag = "Cursos",
    summary = "Update a course",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Course id")),
    request_body = CourseInput,
    responses(
        (status = 200, description = "Updated course", body = Course),
        (status = 400, description = "Missing field or duplicate codigo", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such course", body = ErrorBody)
    )
)]
pub async fn update_course(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<CourseInput>,
) -> Result<Json<Course>, ApiError> {
    let course = state.courses.update(id, input).await?;

    info!(
        event = "curso.updated",
        user = user.subject.as_str(),
        request_id = %user.request_id,
        curso_id = id,
        "Course updated"
    );
    Ok(Json(course))
}

/// Delete a course and everything attached to it
#[utoipa::path(
    delete,
    path = "/api/cursos/{id}",
    tag = "Cursos",
    summary = "Delete a course",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course deleted", body = MensajeGenerico),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such course", body = ErrorBody)
    )
)]
pub async fn delete_course(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MensajeGenerico>, ApiError> {
    let message = state.courses.delete(id).await?;

    info!(
        event = "curso.deleted",
        user = user.subject.as_str(),
        request_id = %user.request_id,
        curso_id = id,
        "Course deleted"
    );
    Ok(Json(message))
}
