/// Lesson model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE lessons (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     subject_id UUID NOT NULL,
///     title TEXT NOT NULL,
///     description TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// # use docportal_shared::models::lesson::{CreateLesson, Lesson, UpdateLesson};
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
/// # async fn example(pool: PgPool, subject_id: Uuid) -> Result<(), sqlx::Error> {
/// let lesson = Lesson::create(&pool, CreateLesson {
///     subject_id,
///     title: "Week 1".to_string(),
///     description: None,
/// }).await?;
///
/// let update = UpdateLesson {
///     title: Some("Week 1: Introduction".to_string()),
///     ..Default::default()
/// };
/// Lesson::update(&pool, lesson.id, update).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const LESSON_COLUMNS: &str = "id, subject_id, title, description, created_at, updated_at";

/// A lesson nested under a subject
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Lesson {
    pub id: Uuid,

    /// Owning subject
    pub subject_id: Uuid,

    pub title: String,

    pub description: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLesson {
    pub subject_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

/// Input for updating an existing lesson
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLesson {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,
}

impl Lesson {
    /// Creates a new lesson under a subject
    ///
    /// The subject is not checked here; callers verify it exists first.
    pub async fn create(pool: &PgPool, data: CreateLesson) -> Result<Self, sqlx::Error> {
        let lesson = sqlx::query_as::<_, Lesson>(&format!(
            "INSERT INTO lessons (subject_id, title, description) VALUES ($1, $2, $3) RETURNING {}",
            LESSON_COLUMNS
        ))
        .bind(data.subject_id)
        .bind(data.title)
        .bind(data.description)
        .fetch_one(pool)
        .await?;

        Ok(lesson)
    }

    /// Finds a lesson by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let lesson = sqlx::query_as::<_, Lesson>(&format!(
            "SELECT {} FROM lessons WHERE id = $1",
            LESSON_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(lesson)
    }

    /// Lists lessons of a subject in creation order (oldest first)
    pub async fn list_by_subject(pool: &PgPool, subject_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let lessons = sqlx::query_as::<_, Lesson>(&format!(
            "SELECT {} FROM lessons WHERE subject_id = $1 ORDER BY created_at ASC",
            LESSON_COLUMNS
        ))
        .bind(subject_id)
        .fetch_all(pool)
        .await?;

        Ok(lessons)
    }

    /// Updates an existing lesson
    ///
    /// Only non-None fields in `data` will be updated. The `updated_at`
    /// timestamp is always refreshed.
    ///
    /// # Returns
    ///
    /// The updated lesson if found, None if the lesson doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateLesson,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE lessons SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {}", LESSON_COLUMNS));

        let mut q = sqlx::query_as::<_, Lesson>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }

        let lesson = q.fetch_optional(pool).await?;

        Ok(lesson)
    }

    /// Deletes a lesson and every document attached to it
    ///
    /// # Returns
    ///
    /// `None` if the lesson didn't exist, otherwise the number of
    /// documents removed with it.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<u64>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Ok(None);
        }

        let documents = sqlx::query("DELETE FROM documents WHERE lesson_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        tracing::debug!(lesson_id = %id, documents, "Lesson deleted with cascade");
        Ok(Some(documents))
    }
}
