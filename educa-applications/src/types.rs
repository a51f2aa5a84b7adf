//! Course aggregate and nested entity types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Message returned by the delete operation
pub const COURSE_DELETED_MESSAGE: &str = "Curso eliminado";

/// A course record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Course {
    /// Server-assigned identifier
    #[cfg_attr(feature = "openapi", schema(example = 1))]
    pub id: i64,
    #[cfg_attr(feature = "openapi", schema(example = "Matemáticas I"))]
    pub nombre: String,
    /// Unique course code, compared case-insensitively
    #[cfg_attr(feature = "openapi", schema(example = "ABC123"))]
    pub codigo: String,
}

/// Create/replace payload for a course. Fields are optional so that a
/// missing field is reported as a validation error with the field name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CourseInput {
    #[cfg_attr(feature = "openapi", schema(example = "Matemáticas I"))]
    pub nombre: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "ABC123"))]
    pub codigo: Option<String>,
}

impl CourseInput {
    pub fn new(nombre: impl Into<String>, codigo: impl Into<String>) -> Self {
        Self {
            nombre: Some(nombre.into()),
            codigo: Some(codigo.into()),
        }
    }
}

/// Validated course fields ready for storage
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDraft {
    pub nombre: String,
    pub codigo: String,
}

impl CourseDraft {
    /// Normalised form of `codigo` used by the uniqueness index
    pub fn codigo_key(&self) -> String {
        codigo_key(&self.codigo)
    }
}

/// Uniqueness key for a course code: trimmed and lower-cased
pub fn codigo_key(codigo: &str) -> String {
    codigo.trim().to_lowercase()
}

/// Generic message body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MensajeGenerico {
    #[cfg_attr(feature = "openapi", schema(example = "Curso eliminado"))]
    pub msg: String,
}

impl MensajeGenerico {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// A grade recorded for a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Grade {
    pub id: i64,
    pub curso_id: i64,
    #[cfg_attr(feature = "openapi", schema(example = 95.5))]
    pub valor: f64,
    #[cfg_attr(feature = "openapi", schema(example = "Tarea 1"))]
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct NewGrade {
    #[cfg_attr(feature = "openapi", schema(example = 95.5))]
    pub valor: Option<f64>,
    #[cfg_attr(feature = "openapi", schema(example = "Tarea 1"))]
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradeDraft {
    pub valor: f64,
    pub descripcion: Option<String>,
}

/// A photo in a course gallery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct GalleryPhoto {
    pub id: i64,
    pub curso_id: i64,
    #[cfg_attr(feature = "openapi", schema(example = "http://ejemplo.com/foto1.jpg"))]
    pub url: String,
    #[cfg_attr(feature = "openapi", schema(example = "Clase de campo"))]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct NewGalleryPhoto {
    #[cfg_attr(feature = "openapi", schema(example = "http://ejemplo.com/foto1.jpg"))]
    pub url: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "Clase de campo"))]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryPhotoDraft {
    pub url: String,
    pub caption: Option<String>,
}

/// A course announcement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Announcement {
    pub id: i64,
    pub curso_id: i64,
    #[cfg_attr(feature = "openapi", schema(example = "Examen parcial el lunes"))]
    pub contenido: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct NewAnnouncement {
    #[cfg_attr(feature = "openapi", schema(example = "Examen parcial el lunes"))]
    pub contenido: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnouncementDraft {
    pub contenido: String,
    pub created_at: DateTime<Utc>,
}
