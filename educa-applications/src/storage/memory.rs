//! In-memory course storage (default backend)

use super::CourseStorage;
use crate::types::{
    codigo_key, Announcement, AnnouncementDraft, Course, CourseDraft, GalleryPhoto,
    GalleryPhotoDraft, Grade, GradeDraft,
};
use async_trait::async_trait;
use educa_core::EducaResult;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Per-table id counters. Ids are never reused, even after deletes.
#[derive(Debug)]
struct Sequences {
    course: i64,
    grade: i64,
    photo: i64,
    announcement: i64,
}

impl Default for Sequences {
    fn default() -> Self {
        Self {
            course: 1,
            grade: 1,
            photo: 1,
            announcement: 1,
        }
    }
}

fn next(seq: &mut i64) -> i64 {
    let id = *seq;
    *seq += 1;
    id
}

#[derive(Debug, Default)]
struct Tables {
    /// Keyed by id; ids are monotonic so iteration order is insertion order
    courses: BTreeMap<i64, Course>,
    grades: Vec<Grade>,
    photos: Vec<GalleryPhoto>,
    announcements: Vec<Announcement>,
    sequences: Sequences,
}

/// In-memory storage. Every table sits behind one lock, so readers always
/// see whole records and a cascade delete is atomic.
#[derive(Debug, Default)]
pub struct MemoryCourseStorage {
    tables: RwLock<Tables>,
}

impl MemoryCourseStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseStorage for MemoryCourseStorage {
    async fn list_courses(&self) -> EducaResult<Vec<Course>> {
        let tables = self.tables.read().await;
        Ok(tables.courses.values().cloned().collect())
    }

    async fn load_course(&self, id: i64) -> EducaResult<Option<Course>> {
        let tables = self.tables.read().await;
        Ok(tables.courses.get(&id).cloned())
    }

    async fn find_by_codigo_key(&self, key: &str) -> EducaResult<Option<Course>> {
        let tables = self.tables.read().await;
        Ok(tables
            .courses
            .values()
            .find(|course| codigo_key(&course.codigo) == key)
            .cloned())
    }

    async fn insert_course(&self, draft: &CourseDraft) -> EducaResult<Course> {
        let mut tables = self.tables.write().await;
        let course = Course {
            id: next(&mut tables.sequences.course),
            nombre: draft.nombre.clone(),
            codigo: draft.codigo.clone(),
        };
        tables.courses.insert(course.id, course.clone());
        debug!("Saved course {} to memory storage", course.id);
        Ok(course)
    }

    async fn update_course(&self, id: i64, draft: &CourseDraft) -> EducaResult<Option<Course>> {
        let mut tables = self.tables.write().await;
        Ok(tables.courses.get_mut(&id).map(|course| {
            course.nombre = draft.nombre.clone();
            course.codigo = draft.codigo.clone();
            course.clone()
        }))
    }

    async fn delete_course(&self, id: i64) -> EducaResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.courses.remove(&id).is_none() {
            return Ok(false);
        }

        tables.grades.retain(|g| g.curso_id != id);
        tables.photos.retain(|p| p.curso_id != id);
        tables.announcements.retain(|a| a.curso_id != id);
        debug!("Deleted course {} and its collections from memory storage", id);
        Ok(true)
    }

    async fn list_grades(&self, curso_id: i64) -> EducaResult<Vec<Grade>> {
        let tables = self.tables.read().await;
        Ok(tables
            .grades
            .iter()
            .filter(|g| g.curso_id == curso_id)
            .cloned()
            .collect())
    }

    async fn insert_grade(&self, curso_id: i64, draft: &GradeDraft) -> EducaResult<Grade> {
        let mut tables = self.tables.write().await;
        let grade = Grade {
            id: next(&mut tables.sequences.grade),
            curso_id,
            valor: draft.valor,
            descripcion: draft.descripcion.clone(),
        };
        tables.grades.push(grade.clone());
        Ok(grade)
    }

    async fn list_photos(&self, curso_id: i64) -> EducaResult<Vec<GalleryPhoto>> {
        let tables = self.tables.read().await;
        Ok(tables
            .photos
            .iter()
            .filter(|p| p.curso_id == curso_id)
            .cloned()
            .collect())
    }

    async fn insert_photo(
        &self,
        curso_id: i64,
        draft: &GalleryPhotoDraft,
    ) -> EducaResult<GalleryPhoto> {
        let mut tables = self.tables.write().await;
        let photo = GalleryPhoto {
            id: next(&mut tables.sequences.photo),
            curso_id,
            url: draft.url.clone(),
            caption: draft.caption.clone(),
        };
        tables.photos.push(photo.clone());
        Ok(photo)
    }

    async fn list_announcements(&self, curso_id: i64) -> EducaResult<Vec<Announcement>> {
        let tables = self.tables.read().await;
        Ok(tables
            .announcements
            .iter()
            .filter(|a| a.curso_id == curso_id)
            .cloned()
            .collect())
    }

    async fn insert_announcement(
        &self,
        curso_id: i64,
        draft: &AnnouncementDraft,
    ) -> EducaResult<Announcement> {
        let mut tables = self.tables.write().await;
        let announcement = Announcement {
            id: next(&mut tables.sequences.announcement),
            curso_id,
            contenido: draft.contenido.clone(),
            created_at: draft.created_at,
        };
        tables.announcements.push(announcement.clone());
        Ok(announcement)
    }

    async fn health_check(&self) -> EducaResult<()> {
        // Memory storage is always healthy
        Ok(())
    }
}
