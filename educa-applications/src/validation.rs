//! Payload validation shared by the course and collection managers

use crate::errors::{CourseError, CourseResult};
use crate::types::{
    AnnouncementDraft, CourseDraft, CourseInput, GalleryPhotoDraft, GradeDraft, NewAnnouncement,
    NewGalleryPhoto, NewGrade,
};
use chrono::Utc;
use url::Url;

/// Required text field: present and non-blank. Returns the trimmed value.
pub fn required_text(value: Option<String>, field: &str) -> CourseResult<String> {
    match value {
        None => Err(CourseError::validation(field, "is required")),
        Some(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Err(CourseError::validation(field, "must not be empty"))
            } else {
                Ok(trimmed.to_string())
            }
        }
    }
}

/// Optional text: blank strings collapse to `None`
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

pub fn validate_course(input: CourseInput) -> CourseResult<CourseDraft> {
    Ok(CourseDraft {
        nombre: required_text(input.nombre, "nombre")?,
        codigo: required_text(input.codigo, "codigo")?,
    })
}

pub fn validate_grade(payload: NewGrade) -> CourseResult<GradeDraft> {
    let valor = payload
        .valor
        .ok_or_else(|| CourseError::validation("valor", "is required"))?;

    if !valor.is_finite() {
        return Err(CourseError::validation("valor", "must be a finite number"));
    }

    Ok(GradeDraft {
        valor,
        descripcion: optional_text(payload.descripcion),
    })
}

pub fn validate_gallery_photo(payload: NewGalleryPhoto) -> CourseResult<GalleryPhotoDraft> {
    let raw = required_text(payload.url, "url")?;

    let parsed = Url::parse(&raw)
        .map_err(|e| CourseError::validation("url", format!("is not a valid URL: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(CourseError::validation(
            "url",
            "must be an absolute http or https URL",
        ));
    }

    Ok(GalleryPhotoDraft {
        url: raw,
        caption: optional_text(payload.caption),
    })
}

pub fn validate_announcement(payload: NewAnnouncement) -> CourseResult<AnnouncementDraft> {
    Ok(AnnouncementDraft {
        contenido: required_text(payload.contenido, "contenido")?,
        created_at: Utc::now(),
    })
}
