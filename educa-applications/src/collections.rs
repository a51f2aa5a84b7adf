//! Nested Collection Managers
//!
//! Grades, gallery photos and announcements hang off a course. Each
//! collection is described by a [`NestedCollection`] marker and managed by
//! the generic [`CollectionManager`], which checks the parent course through
//! the [`CourseRepository`] before touching its own storage.

use crate::courses::CourseRepository;
use crate::errors::CourseResult;
use crate::storage::CourseStorage;
use crate::types::{
    Announcement, AnnouncementDraft, GalleryPhoto, GalleryPhotoDraft, Grade, GradeDraft,
    NewAnnouncement, NewGalleryPhoto, NewGrade,
};
use crate::validation::{validate_announcement, validate_gallery_photo, validate_grade};
use async_trait::async_trait;
use educa_core::EducaResult;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::info;

/// A collection owned by a course
#[async_trait]
pub trait NestedCollection: Send + Sync + 'static {
    type Item: Send;
    type Payload: Send;
    type Draft: Send + Sync;

    /// Collection name used in logs
    const NAME: &'static str;

    fn validate(payload: Self::Payload) -> CourseResult<Self::Draft>;

    async fn list(storage: &dyn CourseStorage, curso_id: i64) -> EducaResult<Vec<Self::Item>>;

    async fn insert(
        storage: &dyn CourseStorage,
        curso_id: i64,
        draft: &Self::Draft,
    ) -> EducaResult<Self::Item>;
}

/// Grades (`/notas`)
pub struct Grades;

/// Gallery photos (`/galeria`)
pub struct Gallery;

/// Announcements (`/anuncios`)
pub struct Announcements;

#[async_trait]
impl NestedCollection for Grades {
    type Item = Grade;
    type Payload = NewGrade;
    type Draft = GradeDraft;

    const NAME: &'static str = "notas";

    fn validate(payload: NewGrade) -> CourseResult<GradeDraft> {
        validate_grade(payload)
    }

    async fn list(storage: &dyn CourseStorage, curso_id: i64) -> EducaResult<Vec<Grade>> {
        storage.list_grades(curso_id).await
    }

    async fn insert(
        storage: &dyn CourseStorage,
        curso_id: i64,
        draft: &GradeDraft,
    ) -> EducaResult<Grade> {
        storage.insert_grade(curso_id, draft).await
    }
}

#[async_trait]
impl NestedCollection for Gallery {
    type Item = GalleryPhoto;
    type Payload = NewGalleryPhoto;
    type Draft = GalleryPhotoDraft;

    const NAME: &'static str = "galeria";

    fn validate(payload: NewGalleryPhoto) -> CourseResult<GalleryPhotoDraft> {
        validate_gallery_photo(payload)
    }

    async fn list(storage: &dyn CourseStorage, curso_id: i64) -> EducaResult<Vec<GalleryPhoto>> {
        storage.list_photos(curso_id).await
    }

    async fn insert(
        storage: &dyn CourseStorage,
        curso_id: i64,
        draft: &GalleryPhotoDraft,
    ) -> EducaResult<GalleryPhoto> {
        storage.insert_photo(curso_id, draft).await
    }
}

#[async_trait]
impl NestedCollection for Announcements {
    type Item = Announcement;
    type Payload = NewAnnouncement;
    type Draft = AnnouncementDraft;

    const NAME: &'static str = "anuncios";

    fn validate(payload: NewAnnouncement) -> CourseResult<AnnouncementDraft> {
        validate_announcement(payload)
    }

    async fn list(storage: &dyn CourseStorage, curso_id: i64) -> EducaResult<Vec<Announcement>> {
        storage.list_announcements(curso_id).await
    }

    async fn insert(
        storage: &dyn CourseStorage,
        curso_id: i64,
        draft: &AnnouncementDraft,
    ) -> EducaResult<Announcement> {
        storage.insert_announcement(curso_id, draft).await
    }
}

/// List/add over one nested collection of a course
pub struct CollectionManager<C> {
    courses: Arc<CourseRepository>,
    _collection: PhantomData<fn() -> C>,
}

pub type GradeManager = CollectionManager<Grades>;
pub type GalleryManager = CollectionManager<Gallery>;
pub type AnnouncementManager = CollectionManager<Announcements>;

impl<C> Clone for CollectionManager<C> {
    fn clone(&self) -> Self {
        Self {
            courses: Arc::clone(&self.courses),
            _collection: PhantomData,
        }
    }
}

impl<C: NestedCollection> CollectionManager<C> {
    pub fn new(courses: Arc<CourseRepository>) -> Self {
        Self {
            courses,
            _collection: PhantomData,
        }
    }

    pub async fn list(&self, curso_id: i64) -> CourseResult<Vec<C::Item>> {
        self.courses.get(curso_id).await?;
        let items = C::list(self.courses.storage().as_ref(), curso_id).await?;
        Ok(items)
    }

    /// Add an item to the course's collection.
    ///
    /// Holds the repository write lock across the parent check and the
    /// insert, so a concurrent delete of the course either happens first
    /// (and this fails with NotFound) or waits until the item is stored
    /// and then cascades over it.
    pub async fn add(&self, curso_id: i64, payload: C::Payload) -> CourseResult<C::Item> {
        let _guard = self.courses.write_guard().await;

        self.courses.get(curso_id).await?;
        let draft = C::validate(payload)?;
        let item = C::insert(self.courses.storage().as_ref(), curso_id, &draft).await?;

        info!(course_id = curso_id, collection = C::NAME, "Collection item added");
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CourseInput;

    async fn setup() -> (Arc<CourseRepository>, i64) {
        let repo = Arc::new(CourseRepository::in_memory());
        let course = repo
            .create(CourseInput::new("Biología", "BIO-1"))
            .await
            .unwrap();
        (repo, course.id)
    }

    #[tokio::test]
    async fn grades_are_scoped_to_their_course() {
        let (repo, curso_id) = setup().await;
        let other = repo
            .create(CourseInput::new("Química", "QUI-1"))
            .await
            .unwrap();
        let grades = GradeManager::new(repo);

        let grade = grades
            .add(
                curso_id,
                NewGrade {
                    valor: Some(7.5),
                    descripcion: Some("Parcial".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(grade.curso_id, curso_id);

        assert_eq!(grades.list(curso_id).await.unwrap(), vec![grade]);
        assert!(grades.list(other.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_to_missing_course_is_not_found_even_with_bad_payload() {
        let (repo, _) = setup().await;
        let gallery = GalleryManager::new(repo);

        let err = gallery
            .add(999, NewGalleryPhoto::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(gallery.list(999).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn invalid_payload_is_not_stored() {
        let (repo, curso_id) = setup().await;
        let gallery = GalleryManager::new(repo);

        let err = gallery
            .add(
                curso_id,
                NewGalleryPhoto {
                    url: Some("no es una url".into()),
                    caption: None,
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(gallery.list(curso_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn announcements_get_a_timestamp() {
        let (repo, curso_id) = setup().await;
        let announcements = AnnouncementManager::new(repo);

        let before = chrono::Utc::now();
        let item = announcements
            .add(
                curso_id,
                NewAnnouncement {
                    contenido: Some("Examen el lunes".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(item.contenido, "Examen el lunes");
        assert!(item.created_at >= before);
    }

    #[tokio::test]
    async fn deleting_course_removes_its_collections() {
        let (repo, curso_id) = setup().await;
        let grades = GradeManager::new(Arc::clone(&repo));
        grades
            .add(
                curso_id,
                NewGrade {
                    valor: Some(10.0),
                    descripcion: None,
                },
            )
            .await
            .unwrap();

        repo.delete(curso_id).await.unwrap();
        assert!(grades.list(curso_id).await.unwrap_err().is_not_found());
        assert!(repo
            .storage()
            .list_grades(curso_id)
            .await
            .unwrap()
            .is_empty());
    }
}
