//! Course Repository
//!
//! CRUD over the Course aggregate. All mutations, including the nested
//! collection inserts in [`crate::collections`], serialise on a single write
//! lock so that the codigo uniqueness check and the insert that follows it
//! cannot interleave with another writer.

use crate::errors::{CourseError, CourseResult};
use crate::storage::{CourseStorage, MemoryCourseStorage};
use crate::types::{Course, CourseDraft, CourseInput, MensajeGenerico, COURSE_DELETED_MESSAGE};
use crate::validation::validate_course;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

pub struct CourseRepository {
    storage: Arc<dyn CourseStorage>,
    write_lock: Mutex<()>,
}

impl CourseRepository {
    pub fn new(storage: Arc<dyn CourseStorage>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCourseStorage::new()))
    }

    /// Repository backed by SQLite at `database_url`
    #[cfg(feature = "sqlite")]
    pub async fn with_sqlite(database_url: &str) -> CourseResult<Self> {
        let storage = crate::storage::SqliteCourseStorage::from_url(database_url).await?;
        Ok(Self::new(Arc::new(storage)))
    }

    pub fn storage(&self) -> &Arc<dyn CourseStorage> {
        &self.storage
    }

    /// Acquire the repository-wide write lock
    pub(crate) async fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    pub async fn list(&self) -> CourseResult<Vec<Course>> {
        let courses = self.storage.list_courses().await?;
        debug!("Listed {} courses", courses.len());
        Ok(courses)
    }

    pub async fn get(&self, id: i64) -> CourseResult<Course> {
        self.storage
            .load_course(id)
            .await?
            .ok_or_else(|| CourseError::course_not_found(id))
    }

    pub async fn create(&self, input: CourseInput) -> CourseResult<Course> {
        let draft = validate_course(input)?;

        let _guard = self.write_guard().await;
        self.ensure_codigo_available(&draft, None).await?;
        let course = self.storage.insert_course(&draft).await?;

        info!(
            course_id = course.id,
            codigo = %course.codigo,
            "Course created"
        );
        Ok(course)
    }

    /// Full replacement of nombre and codigo. The id never changes.
    pub async fn update(&self, id: i64, input: CourseInput) -> CourseResult<Course> {
        let _guard = self.write_guard().await;

        // Unknown id wins over a bad payload
        self.get(id).await?;
        let draft = validate_course(input)?;
        self.ensure_codigo_available(&draft, Some(id)).await?;

        let course = self
            .storage
            .update_course(id, &draft)
            .await?
            .ok_or_else(|| CourseError::course_not_found(id))?;

        info!(course_id = id, "Course updated");
        Ok(course)
    }

    /// Delete a course and cascade to its collections
    pub async fn delete(&self, id: i64) -> CourseResult<MensajeGenerico> {
        let _guard = self.write_guard().await;

        if !self.storage.delete_course(id).await? {
            return Err(CourseError::course_not_found(id));
        }

        info!(course_id = id, "Course deleted");
        Ok(MensajeGenerico::new(COURSE_DELETED_MESSAGE))
    }

    pub async fn health_check(&self) -> CourseResult<()> {
        self.storage.health_check().await?;
        Ok(())
    }

    /// Caller must hold the write guard.
    async fn ensure_codigo_available(
        &self,
        draft: &CourseDraft,
        exclude: Option<i64>,
    ) -> CourseResult<()> {
        match self.storage.find_by_codigo_key(&draft.codigo_key()).await? {
            Some(existing) if Some(existing.id) != exclude => Err(CourseError::validation(
                "codigo",
                format!("'{}' is already used by course {}", draft.codigo, existing.id),
            )),
            _ => Ok(()),
        }
    }
}
