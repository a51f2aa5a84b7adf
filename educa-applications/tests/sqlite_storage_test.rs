#![cfg(feature = "sqlite")]
//! SQLite backend behind the course repository

use educa_applications::{
    CourseInput, CourseRepository, GalleryManager, GradeManager, NewGalleryPhoto, NewGrade,
};
use std::sync::Arc;
use tempfile::TempDir;

async fn memory_repo() -> Arc<CourseRepository> {
    Arc::new(
        CourseRepository::with_sqlite("sqlite::memory:")
            .await
            .expect("in-memory sqlite"),
    )
}

#[tokio::test]
async fn crud_round_trip() {
    let repo = memory_repo().await;

    let course = repo
        .create(CourseInput::new("Lenguaje", "LEN-1"))
        .await
        .unwrap();
    assert_eq!(repo.get(course.id).await.unwrap(), course);

    let updated = repo
        .update(course.id, CourseInput::new("Lenguaje y Literatura", "LEN-2"))
        .await
        .unwrap();
    assert_eq!(repo.list().await.unwrap(), vec![updated]);

    repo.delete(course.id).await.unwrap();
    assert!(repo.get(course.id).await.unwrap_err().is_not_found());
    assert!(repo.delete(course.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn codigo_uniqueness_ignores_case() {
    let repo = memory_repo().await;
    repo.create(CourseInput::new("Inglés", "ENG-1"))
        .await
        .unwrap();

    let err = repo
        .create(CourseInput::new("Inglés B", "eng-1"))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn delete_cascades_to_collections() {
    let repo = memory_repo().await;
    let course = repo
        .create(CourseInput::new("Geografía", "GEO"))
        .await
        .unwrap();

    let grades = GradeManager::new(Arc::clone(&repo));
    let gallery = GalleryManager::new(Arc::clone(&repo));
    grades
        .add(
            course.id,
            NewGrade {
                valor: Some(88.0),
                descripcion: Some("Mapa".into()),
            },
        )
        .await
        .unwrap();
    let photo = gallery
        .add(
            course.id,
            NewGalleryPhoto {
                url: Some("https://ejemplo.com/mapa.png".into()),
                caption: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(photo.caption, None);
    assert_eq!(gallery.list(course.id).await.unwrap(), vec![photo]);

    repo.delete(course.id).await.unwrap();
    let storage = repo.storage();
    assert!(storage.list_grades(course.id).await.unwrap().is_empty());
    assert!(storage.list_photos(course.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("educa.db").display());

    let id = {
        let repo = CourseRepository::with_sqlite(&url).await.unwrap();
        repo.create(CourseInput::new("Filosofía", "FIL"))
            .await
            .unwrap()
            .id
    };

    let reopened = CourseRepository::with_sqlite(&url).await.unwrap();
    assert_eq!(reopened.get(id).await.unwrap().nombre, "Filosofía");
    reopened.health_check().await.unwrap();
}
