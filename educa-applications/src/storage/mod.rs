//! Course storage backends
//!
//! The persistence collaborator behind the Course Repository. Backends only
//! store and fetch; validation, uniqueness and parent-existence rules are
//! enforced by the repository and collection managers above them.

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::MemoryCourseStorage;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteCourseStorage;

use crate::types::{
    Announcement, AnnouncementDraft, Course, CourseDraft, GalleryPhoto, GalleryPhotoDraft, Grade,
    GradeDraft,
};
use async_trait::async_trait;
use educa_core::EducaResult;

/// Storage trait for courses and their nested collections
#[async_trait]
pub trait CourseStorage: Send + Sync {
    /// All courses in insertion order
    async fn list_courses(&self) -> EducaResult<Vec<Course>>;

    async fn load_course(&self, id: i64) -> EducaResult<Option<Course>>;

    /// Look up a course by the normalised codigo key
    async fn find_by_codigo_key(&self, codigo_key: &str) -> EducaResult<Option<Course>>;

    /// Insert a course, assigning a fresh id
    async fn insert_course(&self, draft: &CourseDraft) -> EducaResult<Course>;

    /// Replace nombre and codigo. `None` when the course does not exist.
    async fn update_course(&self, id: i64, draft: &CourseDraft) -> EducaResult<Option<Course>>;

    /// Remove a course together with its grades, photos and announcements.
    /// Returns `false` when the course does not exist.
    async fn delete_course(&self, id: i64) -> EducaResult<bool>;

    async fn list_grades(&self, curso_id: i64) -> EducaResult<Vec<Grade>>;

    async fn insert_grade(&self, curso_id: i64, draft: &GradeDraft) -> EducaResult<Grade>;

    async fn list_photos(&self, curso_id: i64) -> EducaResult<Vec<GalleryPhoto>>;

    async fn insert_photo(
        &self,
        curso_id: i64,
        draft: &GalleryPhotoDraft,
    ) -> EducaResult<GalleryPhoto>;

    async fn list_announcements(&self, curso_id: i64) -> EducaResult<Vec<Announcement>>;

    async fn insert_announcement(
        &self,
        curso_id: i64,
        draft: &AnnouncementDraft,
    ) -> EducaResult<Announcement>;

    /// Health check for the storage backend
    async fn health_check(&self) -> EducaResult<()>;
}
