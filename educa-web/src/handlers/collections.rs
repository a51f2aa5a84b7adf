//! Nested collection handlers: notas, galeria, anuncios

use crate::error::{ApiError, ApiJson, ApiPath, ErrorBody};
use crate::middleware::AuthenticatedUser;
use crate::AppState;
use axum::{extract::State, response::Json};
use educa_applications::{
    Announcement, CollectionManager, GalleryPhoto, Grade, NestedCollection, NewAnnouncement,
    NewGalleryPhoto, NewGrade,
};
use tracing::info;

async fn add_item<C: NestedCollection>(
    manager: &CollectionManager<C>,
    user: &AuthenticatedUser,
    curso_id: i64,
    payload: C::Payload,
) -> Result<C::Item, ApiError> {
    let item = manager.add(curso_id, payload).await?;

    info!(
        event = "coleccion.item_added",
        collection = C::NAME,
        user = user.subject.as_str(),
        request_id = %user.request_id,
        curso_id,
        "Collection item added"
    );
    Ok(item)
}

/// List grades of a course
#[utoipa::path(
    get,
    path = "/api/cursos/{id}/notas",
    tag = "Notas",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Grades of the course", body = Vec<Grade>),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such course", body = ErrorBody)
    )
)]
pub async fn list_grades(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<Grade>>, ApiError> {
    Ok(Json(state.grades.list(id).await?))
}

/// Record a grade
#[utoipa::path(
    post,
    path = "/api/cursos/{id}/notas",
    tag = "Notas",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Course id")),
    request_body = NewGrade,
    responses(
        (status = 200, description = "Stored grade", body = Grade),
        (status = 400, description = "valor missing or not a number", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such course", body = ErrorBody)
    )
)]
pub async fn add_grade(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<NewGrade>,
) -> Result<Json<Grade>, ApiError> {
    add_item(&state.grades, &user, id, payload).await.map(Json)
}

/// List gallery photos of a course
#[utoipa::path(
    get,
    path = "/api/cursos/{id}/galeria",
    tag = "Galeria",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Photos of the course", body = Vec<GalleryPhoto>),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such course", body = ErrorBody)
    )
)]
pub async fn list_photos(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<GalleryPhoto>>, ApiError> {
    Ok(Json(state.gallery.list(id).await?))
}

/// Add a photo to the gallery
#[utoipa::path(
    post,
    path = "/api/cursos/{id}/galeria",
    tag = "Galeria",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Course id")),
    request_body = NewGalleryPhoto,
    responses(
        (status = 200, description = "Stored photo", body = GalleryPhoto),
        (status = 400, description = "url missing or not an http(s) URL", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such course", body = ErrorBody)
    )
)]
pub async fn add_photo(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<NewGalleryPhoto>,
) -> Result<Json<GalleryPhoto>, ApiError> {
    add_item(&state.gallery, &user, id, payload).await.map(Json)
}

/// List announcements of a course
#[utoipa::path(
    get,
    path = "/api/cursos/{id}/anuncios",
    tag = "Anuncios",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Announcements of the course", body = Vec<Announcement>),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such course", body = ErrorBody)
    )
)]
pub async fn list_announcements(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<Announcement>>, ApiError> {
    Ok(Json(state.announcements.list(id).await?))
}

/// Post an announcement
#[utoipa::path(
    post,
    path = "/api/cursos/{id}/anuncios",
    tag = "Anuncios",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Course id")),
    request_body = NewAnnouncement,
    responses(
        (status = 200, description = "Stored announcement", body = Announcement),
        (status = 400, description = "contenido missing or empty", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such course", body = ErrorBody)
    )
)]
pub async fn add_announcement(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<NewAnnouncement>,
) -> Result<Json<Announcement>, ApiError> {
    add_item(&state.announcements, &user, id, payload).await.map(Json)
}
