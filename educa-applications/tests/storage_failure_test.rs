//! Storage failures surface as `ServiceUnavailable`

use async_trait::async_trait;
use educa_applications::{
    Announcement, AnnouncementDraft, Course, CourseDraft, CourseError, CourseInput,
    CourseRepository, CourseStorage, GalleryPhoto, GalleryPhotoDraft, Grade, GradeDraft,
    GradeManager, NewGrade,
};
use educa_core::{storage_error, EducaResult};
use std::sync::Arc;

/// Backend whose every call fails, like a dropped database connection
struct UnavailableStorage;

fn down<T>(operation: &str) -> EducaResult<T> {
    Err(storage_error!("connection refused", operation))
}

#[async_trait]
impl CourseStorage for UnavailableStorage {
    async fn list_courses(&self) -> EducaResult<Vec<Course>> {
        down("list_courses")
    }
    async fn load_course(&self, _id: i64) -> EducaResult<Option<Course>> {
        down("load_course")
    }
    async fn find_by_codigo_key(&self, _codigo_key: &str) -> EducaResult<Option<Course>> {
        down("find_by_codigo_key")
    }
    async fn insert_course(&self, _draft: &CourseDraft) -> EducaResult<Course> {
        down("insert_course")
    }
    async fn update_course(&self, _id: i64, _draft: &CourseDraft) -> EducaResult<Option<Course>> {
        down("update_course")
    }
    async fn delete_course(&self, _id: i64) -> EducaResult<bool> {
        down("delete_course")
    }
    async fn list_grades(&self, _curso_id: i64) -> EducaResult<Vec<Grade>> {
        down("list_grades")
    }
    async fn insert_grade(&self, _curso_id: i64, _draft: &GradeDraft) -> EducaResult<Grade> {
        down("insert_grade")
    }
    async fn list_photos(&self, _curso_id: i64) -> EducaResult<Vec<GalleryPhoto>> {
        down("list_photos")
    }
    async fn insert_photo(
        &self,
        _curso_id: i64,
        _draft: &GalleryPhotoDraft,
    ) -> EducaResult<GalleryPhoto> {
        down("insert_photo")
    }
    async fn list_announcements(&self, _curso_id: i64) -> EducaResult<Vec<Announcement>> {
        down("list_announcements")
    }
    async fn insert_announcement(
        &self,
        _curso_id: i64,
        _draft: &AnnouncementDraft,
    ) -> EducaResult<Announcement> {
        down("insert_announcement")
    }
    async fn health_check(&self) -> EducaResult<()> {
        down("health_check")
    }
}

fn unavailable_repository() -> Arc<CourseRepository> {
    Arc::new(CourseRepository::new(Arc::new(UnavailableStorage)))
}

#[tokio::test]
async fn repository_operations_report_service_unavailable() {
    let repo = unavailable_repository();

    assert!(matches!(
        repo.list().await,
        Err(CourseError::ServiceUnavailable(_))
    ));
    assert!(matches!(
        repo.get(1).await,
        Err(CourseError::ServiceUnavailable(_))
    ));
    assert!(matches!(
        repo.create(CourseInput::new("Química", "QUI")).await,
        Err(CourseError::ServiceUnavailable(_))
    ));
    assert!(matches!(
        repo.delete(1).await,
        Err(CourseError::ServiceUnavailable(_))
    ));
    assert!(repo.health_check().await.is_err());
}

#[tokio::test]
async fn collection_add_reports_service_unavailable() {
    let repo = unavailable_repository();
    let grades = GradeManager::new(Arc::clone(&repo));

    let result = grades
        .add(
            1,
            NewGrade {
                valor: Some(6.0),
                descripcion: None,
            },
        )
        .await;
    assert!(matches!(result, Err(CourseError::ServiceUnavailable(_))));
}
