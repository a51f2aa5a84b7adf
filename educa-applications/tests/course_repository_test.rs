//! Course repository and nested collections under concurrency

use educa_applications::{
    AnnouncementManager, CourseInput, CourseRepository, GradeManager, NewAnnouncement, NewGrade,
};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_with_same_codigo_admit_exactly_one() {
    let repo = Arc::new(CourseRepository::in_memory());

    let attempts = (0..16).map(|i| {
        let repo = Arc::clone(&repo);
        tokio::spawn(async move {
            repo.create(CourseInput::new(format!("Curso {i}"), "DUP-01"))
                .await
        })
    });

    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let created = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(created, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.is_validation()));
    assert_eq!(repo.list().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_get_distinct_ids() {
    let repo = Arc::new(CourseRepository::in_memory());

    let attempts = (0..20).map(|i| {
        let repo = Arc::clone(&repo);
        tokio::spawn(async move {
            repo.create(CourseInput::new("Curso", format!("C-{i}")))
                .await
        })
    });

    let ids: HashSet<i64> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked").unwrap().id)
        .collect();
    assert_eq!(ids.len(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn add_racing_delete_leaves_no_orphans() {
    for round in 0..10 {
        let repo = Arc::new(CourseRepository::in_memory());
        let course = repo
            .create(CourseInput::new("Carrera", format!("R-{round}")))
            .await
            .unwrap();
        let course_id = course.id;
        let grades = GradeManager::new(Arc::clone(&repo));

        let adds = (0..8).map(|_| {
            let grades = grades.clone();
            tokio::spawn(async move {
                grades
                    .add(
                        course_id,
                        NewGrade {
                            valor: Some(5.0),
                            descripcion: None,
                        },
                    )
                    .await
            })
        });
        let delete = {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.delete(course_id).await })
        };

        let add_results = join_all(adds).await;
        delete.await.unwrap().unwrap();

        for result in add_results {
            if let Err(e) = result.unwrap() {
                assert!(e.is_not_found());
            }
        }
        assert!(repo
            .storage()
            .list_grades(course_id)
            .await
            .unwrap()
            .is_empty());
    }
}

#[tokio::test]
async fn full_course_lifecycle() {
    let repo = Arc::new(CourseRepository::in_memory());
    assert!(repo.list().await.unwrap().is_empty());

    let course = repo
        .create(CourseInput::new("Matemáticas I", "ABC123"))
        .await
        .unwrap();
    assert_eq!(course.id, 1);

    let announcements = AnnouncementManager::new(Arc::clone(&repo));
    announcements
        .add(
            course.id,
            NewAnnouncement {
                contenido: Some("Bienvenidos".into()),
            },
        )
        .await
        .unwrap();

    let updated = repo
        .update(course.id, CourseInput::new("Matemáticas II", "ABC124"))
        .await
        .unwrap();
    assert_eq!(repo.get(course.id).await.unwrap(), updated);
    assert_eq!(announcements.list(course.id).await.unwrap().len(), 1);

    let msg = repo.delete(course.id).await.unwrap();
    assert_eq!(msg.msg, "Curso eliminado");
    assert!(repo.get(course.id).await.unwrap_err().is_not_found());

    // Freed codigo can be reused, id cannot
    let again = repo
        .create(CourseInput::new("Matemáticas II", "ABC124"))
        .await
        .unwrap();
    assert_eq!(again.id, 2);
}
