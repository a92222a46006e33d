/// Subject model and database operations
///
/// Subjects are the top level of the portal hierarchy. Lessons and
/// documents point at their subject through a plain `subject_id` column.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE subjects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name TEXT NOT NULL UNIQUE,
///     description TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const SUBJECT_COLUMNS: &str = "id, name, description, created_at, updated_at";

/// A subject grouping lessons and documents
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subject {
    /// Unique subject ID
    pub id: Uuid,

    /// Display name (unique)
    pub name: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// When the subject was created
    pub created_at: DateTime<Utc>,

    /// When the subject was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new subject
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubject {
    pub name: String,
    pub description: Option<String>,
}

/// Row counts removed by a cascading subject delete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubjectDeletion {
    pub lessons: u64,
    pub documents: u64,
}

impl Subject {
    /// Creates a new subject
    ///
    /// # Errors
    ///
    /// Returns a database error carrying the `subjects_name_key` constraint
    /// if the name is already taken.
    pub async fn create(pool: &PgPool, data: CreateSubject) -> Result<Self, sqlx::Error> {
        let subject = sqlx::query_as::<_, Subject>(&format!(
            "INSERT INTO subjects (name, description) VALUES ($1, $2) RETURNING {}",
            SUBJECT_COLUMNS
        ))
        .bind(data.name)
        .bind(data.description)
        .fetch_one(pool)
        .await?;

        Ok(subject)
    }

    /// Finds a subject by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let subject = sqlx::query_as::<_, Subject>(&format!(
            "SELECT {} FROM subjects WHERE id = $1",
            SUBJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(subject)
    }

    /// Lists all subjects, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let subjects = sqlx::query_as::<_, Subject>(&format!(
            "SELECT {} FROM subjects ORDER BY created_at DESC",
            SUBJECT_COLUMNS
        ))
        .fetch_all(pool)
        .await?;

        Ok(subjects)
    }

    /// Deletes a subject together with its lessons and documents
    ///
    /// All three deletes run in one transaction.
    ///
    /// # Returns
    ///
    /// `None` if the subject didn't exist (nothing is deleted), otherwise
    /// the number of lessons and documents removed alongside it.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<SubjectDeletion>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Ok(None);
        }

        let documents = sqlx::query("DELETE FROM documents WHERE subject_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let lessons = sqlx::query("DELETE FROM lessons WHERE subject_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        tracing::debug!(
            subject_id = %id,
            lessons,
            documents,
            "Subject deleted with cascade"
        );

        Ok(Some(SubjectDeletion { lessons, documents }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_serializes_null_description() {
        let subject = Subject {
            id: Uuid::new_v4(),
            name: "Physics".to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&subject).unwrap();
        assert_eq!(json["name"], "Physics");
        assert!(json["description"].is_null());
    }

    #[test]
    fn test_subject_deletion_default() {
        let deletion = SubjectDeletion::default();
        assert_eq!(deletion.lessons, 0);
        assert_eq!(deletion.documents, 0);
    }
}
