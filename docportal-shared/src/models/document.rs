/// Document model and database operations
///
/// A document is an uploaded file stored inline as `BYTEA` together with its
/// title, original file name and content type. Every document belongs to a
/// subject and optionally to one lesson of that subject.
///
/// List views use [`DocumentSummary`], which never loads `file_data`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE documents (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     subject_id UUID NOT NULL,
///     lesson_id UUID,
///     title TEXT NOT NULL,
///     file_name TEXT NOT NULL,
///     file_type TEXT NOT NULL,
///     file_data BYTEA NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const DOCUMENT_COLUMNS: &str =
    "id, subject_id, lesson_id, title, file_name, file_type, file_data, created_at, updated_at";

const SUMMARY_COLUMNS: &str = "id, subject_id, lesson_id, title, file_name, file_type, \
     octet_length(file_data)::BIGINT AS file_size, created_at, updated_at";

/// Content type used when the upload didn't declare one
pub const DEFAULT_FILE_TYPE: &str = "application/octet-stream";

/// A stored document including its bytes
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub lesson_id: Option<Uuid>,
    pub title: String,

    /// Original upload name (final path component only)
    pub file_name: String,

    /// MIME type reported at upload
    pub file_type: String,

    /// Raw file content
    #[serde(skip)]
    pub file_data: Vec<u8>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Document metadata without the bytes
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DocumentSummary {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub lesson_id: Option<Uuid>,
    pub title: String,
    pub file_name: String,
    pub file_type: String,

    /// Content length in bytes
    pub file_size: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for storing a new document
#[derive(Debug, Clone)]
pub struct CreateDocument {
    pub subject_id: Uuid,
    pub lesson_id: Option<Uuid>,
    pub title: String,
    pub file_name: String,
    pub file_type: String,
    pub file_data: Vec<u8>,
}

/// Reduces an uploaded file name to its final path component
///
/// Browsers and clients may send full paths (`C:\Users\me\notes.pdf`) or
/// relative ones (`../notes.pdf`). Only the last segment is kept, and `.`
/// or `..` collapse to an empty string.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();

    match base {
        "." | ".." => String::new(),
        other => other.chars().filter(|c| !c.is_control()).collect(),
    }
}

impl Document {
    /// Stores a new document
    ///
    /// # Returns
    ///
    /// The summary of the stored document
    pub async fn create(pool: &PgPool, data: CreateDocument) -> Result<DocumentSummary, sqlx::Error> {
        let file_type = if data.file_type.trim().is_empty() {
            DEFAULT_FILE_TYPE.to_string()
        } else {
            data.file_type
        };

        let document = sqlx::query_as::<_, DocumentSummary>(&format!(
            r#"
            INSERT INTO documents (subject_id, lesson_id, title, file_name, file_type, file_data)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            SUMMARY_COLUMNS
        ))
        .bind(data.subject_id)
        .bind(data.lesson_id)
        .bind(data.title)
        .bind(sanitize_file_name(&data.file_name))
        .bind(file_type)
        .bind(data.file_data)
        .fetch_one(pool)
        .await?;

        Ok(document)
    }

    /// Finds a document by ID, including its bytes
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let document = sqlx::query_as::<_, Document>(&format!(
            "SELECT {} FROM documents WHERE id = $1",
            DOCUMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(document)
    }

    /// Lists document summaries of a subject, newest first
    ///
    /// Includes documents attached to any lesson of the subject.
    pub async fn list_by_subject(
        pool: &PgPool,
        subject_id: Uuid,
    ) -> Result<Vec<DocumentSummary>, sqlx::Error> {
        let documents = sqlx::query_as::<_, DocumentSummary>(&format!(
            "SELECT {} FROM documents WHERE subject_id = $1 ORDER BY created_at DESC",
            SUMMARY_COLUMNS
        ))
        .bind(subject_id)
        .fetch_all(pool)
        .await?;

        Ok(documents)
    }

    /// Lists document summaries of a lesson, newest first
    pub async fn list_by_lesson(
        pool: &PgPool,
        lesson_id: Uuid,
    ) -> Result<Vec<DocumentSummary>, sqlx::Error> {
        let documents = sqlx::query_as::<_, DocumentSummary>(&format!(
            "SELECT {} FROM documents WHERE lesson_id = $1 ORDER BY created_at DESC",
            SUMMARY_COLUMNS
        ))
        .bind(lesson_id)
        .fetch_all(pool)
        .await?;

        Ok(documents)
    }

    /// Loads every document of a subject with its bytes, oldest first
    ///
    /// Used to build the "download all" archive.
    pub async fn list_with_content_by_subject(
        pool: &PgPool,
        subject_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let documents = sqlx::query_as::<_, Document>(&format!(
            "SELECT {} FROM documents WHERE subject_id = $1 ORDER BY created_at ASC",
            DOCUMENT_COLUMNS
        ))
        .bind(subject_id)
        .fetch_all(pool)
        .await?;

        Ok(documents)
    }

    /// Renames a document
    ///
    /// # Returns
    ///
    /// The updated summary, or None if the document doesn't exist
    pub async fn update_title(
        pool: &PgPool,
        id: Uuid,
        title: &str,
    ) -> Result<Option<DocumentSummary>, sqlx::Error> {
        let document = sqlx::query_as::<_, DocumentSummary>(&format!(
            "UPDATE documents SET title = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            SUMMARY_COLUMNS
        ))
        .bind(id)
        .bind(title)
        .fetch_optional(pool)
        .await?;

        Ok(document)
    }

    /// Deletes a document by ID
    ///
    /// # Returns
    ///
    /// True if the document was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name_strips_paths() {
        assert_eq!(sanitize_file_name("notes.pdf"), "notes.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\slides.pptx"), "slides.pptx");
        assert_eq!(sanitize_file_name("  spaced name.txt  "), "spaced name.txt");
    }

    #[test]
    fn test_sanitize_file_name_rejects_dot_segments() {
        assert_eq!(sanitize_file_name(".."), "");
        assert_eq!(sanitize_file_name("dir/."), "");
        assert_eq!(sanitize_file_name("dir/"), "");
    }

    #[test]
    fn test_sanitize_file_name_drops_control_chars() {
        assert_eq!(sanitize_file_name("bad\nname\t.txt"), "badname.txt");
    }

    #[test]
    fn test_document_bytes_not_serialized() {
        let document = Document {
            id: Uuid::new_v4(),
            subject_id: Uuid::new_v4(),
            lesson_id: None,
            title: "Syllabus".to_string(),
            file_name: "syllabus.pdf".to_string(),
            file_type: "application/pdf".to_string(),
            file_data: vec![1, 2, 3],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&document).unwrap();
        assert!(json.get("file_data").is_none());
        assert_eq!(json["file_name"], "syllabus.pdf");
    }
}
