//! Educa Applications - course domain layer
//!
//! Everything between the HTTP surface and the persistence collaborator:
//!
//! - **Course Repository** ([`CourseRepository`]): CRUD over courses with a
//!   case-insensitive unique `codigo`
//! - **Nested Collection Managers** ([`CollectionManager`]): grades, gallery
//!   photos and announcements attached to a course
//! - **Storage** ([`storage`]): in-memory and SQLite backends
//!
//! ## Consistency
//!
//! Every mutation goes through one repository-wide write lock. A nested
//! `add` racing a course `delete` therefore either fails with NotFound or is
//! removed by the cascade; no orphaned item stays visible.

pub mod collections;
pub mod courses;
pub mod errors;
pub mod storage;
pub mod types;
pub mod validation;

pub use collections::{
    AnnouncementManager, Announcements, CollectionManager, Gallery, GalleryManager, GradeManager,
    Grades, NestedCollection,
};
pub use courses::CourseRepository;
pub use errors::{CourseError, CourseResult};
pub use storage::{CourseStorage, MemoryCourseStorage};
#[cfg(feature = "sqlite")]
pub use storage::SqliteCourseStorage;
pub use types::*;
