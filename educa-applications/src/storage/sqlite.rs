//! SQLite course storage

use super::CourseStorage;
use crate::types::{
    Announcement, AnnouncementDraft, Course, CourseDraft, GalleryPhoto, GalleryPhotoDraft, Grade,
    GradeDraft,
};
use async_trait::async_trait;
use educa_core::{storage_error, EducaError, EducaResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS cursos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nombre TEXT NOT NULL,
        codigo TEXT NOT NULL,
        codigo_key TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notas (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        curso_id INTEGER NOT NULL REFERENCES cursos(id) ON DELETE CASCADE,
        valor REAL NOT NULL,
        descripcion TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS fotos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        curso_id INTEGER NOT NULL REFERENCES cursos(id) ON DELETE CASCADE,
        url TEXT NOT NULL,
        caption TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS anuncios (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        curso_id INTEGER NOT NULL REFERENCES cursos(id) ON DELETE CASCADE,
        contenido TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
];

/// Map a sqlx failure onto a storage error tagged with the operation
fn db_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> EducaError {
    move |e| storage_error!(format!("SQLite {operation} failed: {e}"), operation, e)
}

fn course_from_row(row: &SqliteRow) -> Result<Course, sqlx::Error> {
    Ok(Course {
        id: row.try_get("id")?,
        nombre: row.try_get("nombre")?,
        codigo: row.try_get("codigo")?,
    })
}

fn grade_from_row(row: &SqliteRow) -> Result<Grade, sqlx::Error> {
    Ok(Grade {
        id: row.try_get("id")?,
        curso_id: row.try_get("curso_id")?,
        valor: row.try_get("valor")?,
        descripcion: row.try_get("descripcion")?,
    })
}

fn photo_from_row(row: &SqliteRow) -> Result<GalleryPhoto, sqlx::Error> {
    Ok(GalleryPhoto {
        id: row.try_get("id")?,
        curso_id: row.try_get("curso_id")?,
        url: row.try_get("url")?,
        caption: row.try_get("caption")?,
    })
}

fn announcement_from_row(row: &SqliteRow) -> Result<Announcement, sqlx::Error> {
    Ok(Announcement {
        id: row.try_get("id")?,
        curso_id: row.try_get("curso_id")?,
        contenido: row.try_get("contenido")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Course storage backed by a SQLite database
pub struct SqliteCourseStorage {
    pool: SqlitePool,
}

impl SqliteCourseStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url`, creating the file if needed, and apply
    /// the schema.
    pub async fn from_url(database_url: &str) -> EducaResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(db_error("parse database url"))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Each connection to an in-memory database is a separate database
        let in_memory = database_url.contains(":memory:");
        let mut pool_options = SqlitePoolOptions::new().max_connections(if in_memory { 1 } else { 5 });
        if in_memory {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(db_error("connect"))?;

        let storage = Self::new(pool);
        storage.migrate().await?;
        Ok(storage)
    }

    /// Create tables if they do not exist yet
    pub async fn migrate(&self) -> EducaResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(db_error("migrate"))?;
        }

        info!("SQLite course schema is up to date");
        Ok(())
    }
}

#[async_trait]
impl CourseStorage for SqliteCourseStorage {
    async fn list_courses(&self) -> EducaResult<Vec<Course>> {
        let rows = sqlx::query("SELECT id, nombre, codigo FROM cursos ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list courses"))?;

        rows.iter()
            .map(course_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_error("decode course"))
    }

    async fn load_course(&self, id: i64) -> EducaResult<Option<Course>> {
        let row = sqlx::query("SELECT id, nombre, codigo FROM cursos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("load course"))?;

        row.as_ref()
            .map(course_from_row)
            .transpose()
            .map_err(db_error("decode course"))
    }

    async fn find_by_codigo_key(&self, key: &str) -> EducaResult<Option<Course>> {
        let row = sqlx::query("SELECT id, nombre, codigo FROM cursos WHERE codigo_key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find course by codigo"))?;

        row.as_ref()
            .map(course_from_row)
            .transpose()
            .map_err(db_error("decode course"))
    }

    async fn insert_course(&self, draft: &CourseDraft) -> EducaResult<Course> {
        let result = sqlx::query("INSERT INTO cursos (nombre, codigo, codigo_key) VALUES (?, ?, ?)")
            .bind(&draft.nombre)
            .bind(&draft.codigo)
            .bind(draft.codigo_key())
            .execute(&self.pool)
            .await
            .map_err(db_error("insert course"))?;

        let course = Course {
            id: result.last_insert_rowid(),
            nombre: draft.nombre.clone(),
            codigo: draft.codigo.clone(),
        };
        debug!("Saved course {} to SQLite storage", course.id);
        Ok(course)
    }

    async fn update_course(&self, id: i64, draft: &CourseDraft) -> EducaResult<Option<Course>> {
        let result =
            sqlx::query("UPDATE cursos SET nombre = ?, codigo = ?, codigo_key = ? WHERE id = ?")
                .bind(&draft.nombre)
                .bind(&draft.codigo)
                .bind(draft.codigo_key())
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(db_error("update course"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(Course {
            id,
            nombre: draft.nombre.clone(),
            codigo: draft.codigo.clone(),
        }))
    }

    async fn delete_course(&self, id: i64) -> EducaResult<bool> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin delete"))?;

        for table in ["notas", "fotos", "anuncios"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE curso_id = ?"))
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_error("delete course collections"))?;
        }

        let result = sqlx::query("DELETE FROM cursos WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("delete course"))?;

        tx.commit().await.map_err(db_error("commit delete"))?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            debug!("Deleted course {} from SQLite storage", id);
        }
        Ok(deleted)
    }

    async fn list_grades(&self, curso_id: i64) -> EducaResult<Vec<Grade>> {
        let rows = sqlx::query(
            "SELECT id, curso_id, valor, descripcion FROM notas WHERE curso_id = ? ORDER BY id",
        )
        .bind(curso_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list grades"))?;

        rows.iter()
            .map(grade_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_error("decode grade"))
    }

    async fn insert_grade(&self, curso_id: i64, draft: &GradeDraft) -> EducaResult<Grade> {
        let result = sqlx::query("INSERT INTO notas (curso_id, valor, descripcion) VALUES (?, ?, ?)")
            .bind(curso_id)
            .bind(draft.valor)
            .bind(&draft.descripcion)
            .execute(&self.pool)
            .await
            .map_err(db_error("insert grade"))?;

        Ok(Grade {
            id: result.last_insert_rowid(),
            curso_id,
            valor: draft.valor,
            descripcion: draft.descripcion.clone(),
        })
    }

    async fn list_photos(&self, curso_id: i64) -> EducaResult<Vec<GalleryPhoto>> {
        let rows = sqlx::query(
            "SELECT id, curso_id, url, caption FROM fotos WHERE curso_id = ? ORDER BY id",
        )
        .bind(curso_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list photos"))?;

        rows.iter()
            .map(photo_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_error("decode photo"))
    }

    async fn insert_photo(
        &self,
        curso_id: i64,
        draft: &GalleryPhotoDraft,
    ) -> EducaResult<GalleryPhoto> {
        let result = sqlx::query("INSERT INTO fotos (curso_id, url, caption) VALUES (?, ?, ?)")
            .bind(curso_id)
            .bind(&draft.url)
            .bind(&draft.caption)
            .execute(&self.pool)
            .await
            .map_err(db_error("insert photo"))?;

        Ok(GalleryPhoto {
            id: result.last_insert_rowid(),
            curso_id,
            url: draft.url.clone(),
            caption: draft.caption.clone(),
        })
    }

    async fn list_announcements(&self, curso_id: i64) -> EducaResult<Vec<Announcement>> {
        let rows = sqlx::query(
            "SELECT id, curso_id, contenido, created_at FROM anuncios WHERE curso_id = ? ORDER BY id",
        )
        .bind(curso_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list announcements"))?;

        rows.iter()
            .map(announcement_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_error("decode announcement"))
    }

    async fn insert_announcement(
        &self,
        curso_id: i64,
        draft: &AnnouncementDraft,
    ) -> EducaResult<Announcement> {
        let result =
            sqlx::query("INSERT INTO anuncios (curso_id, contenido, created_at) VALUES (?, ?, ?)")
                .bind(curso_id)
                .bind(&draft.contenido)
                .bind(draft.created_at)
                .execute(&self.pool)
                .await
                .map_err(db_error("insert announcement"))?;

        Ok(Announcement {
            id: result.last_insert_rowid(),
            curso_id,
            contenido: draft.contenido.clone(),
            created_at: draft.created_at,
        })
    }

    async fn health_check(&self) -> EducaResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_error("health check"))?;
        Ok(())
    }
}
