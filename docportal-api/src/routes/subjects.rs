/// Subject endpoints
///
/// - `GET /api/subjects` - List subjects, newest first
/// - `POST /api/subjects` - Create a subject (admin)
/// - `GET /api/subjects/:id` - Subject with its documents
/// - `DELETE /api/subjects/:id` - Delete with lessons and documents (admin)
/// - `GET /api/subjects/:id/download` - Every document as one zip

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    routes::{
        auth::MessageResponse, chunked_body, content_disposition, optional_text, Disposition,
    },
};
use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use docportal_shared::{
    archive::{archive_file_name, build_zip, ArchiveEntry},
    models::{
        document::{Document, DocumentSummary},
        subject::{CreateSubject, Subject},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create subject request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubjectRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required (at most 200 characters)"))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

impl CreateSubjectRequest {
    fn normalize(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: optional_text(self.description),
        }
    }
}

/// Subject detail response
#[derive(Debug, Serialize, Deserialize)]
pub struct SubjectDetail {
    pub subject: Subject,

    /// Every document of the subject, lesson documents included
    pub documents: Vec<DocumentSummary>,
}

pub(crate) fn subject_not_found() -> ApiError {
    ApiError::NotFound("Subject not found".to_string())
}

/// List all subjects, newest first
pub async fn list_subjects(State(state): State<AppState>) -> ApiResult<Json<Vec<Subject>>> {
    let subjects = Subject::list(&state.db).await?;
    Ok(Json(subjects))
}

/// Create a subject
///
/// ```text
/// POST /api/subjects
/// Content-Type: application/json
///
/// { "name": "Mathematics", "description": "Algebra and calculus" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Blank name
/// - `409 Conflict`: Name already taken
pub async fn create_subject(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateSubjectRequest>,
) -> ApiResult<(StatusCode, Json<Subject>)> {
    let req = req.normalize();
    req.validate()?;

    let subject = Subject::create(
        &state.db,
        CreateSubject {
            name: req.name,
            description: req.description,
        },
    )
    .await?;

    tracing::info!(subject_id = %subject.id, name = %subject.name, "Subject created");

    Ok((StatusCode::CREATED, Json(subject)))
}

/// Get a subject with its document summaries
pub async fn get_subject(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<SubjectDetail>> {
    let subject = Subject::find_by_id(&state.db, id)
        .await?
        .ok_or_else(subject_not_found)?;

    let documents = Document::list_by_subject(&state.db, id).await?;

    Ok(Json(SubjectDetail { subject, documents }))
}

/// Delete a subject, its lessons and its documents
pub async fn delete_subject(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let deletion = Subject::delete(&state.db, id)
        .await?
        .ok_or_else(subject_not_found)?;

    tracing::info!(
        subject_id = %id,
        lessons = deletion.lessons,
        documents = deletion.documents,
        "Subject deleted"
    );

    Ok(MessageResponse::new("Subject deleted"))
}

/// Download every document of a subject as a zip
///
/// The archive is compressed on a blocking thread and streamed back in
/// chunks.
///
/// # Errors
///
/// - `404 Not Found`: Unknown subject, or a subject without documents
/// - `500 Internal Server Error`: Any failure while building the archive
pub async fn download_subject(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Response> {
    let subject = Subject::find_by_id(&state.db, id)
        .await?
        .ok_or_else(subject_not_found)?;

    let documents = Document::list_with_content_by_subject(&state.db, id).await?;
    if documents.is_empty() {
        return Err(ApiError::NotFound("No documents found".to_string()));
    }

    let entries: Vec<ArchiveEntry> = documents.into_iter().map(ArchiveEntry::from).collect();
    let archive = tokio::task::spawn_blocking(move || build_zip(&entries)).await??;

    tracing::info!(
        subject_id = %id,
        entries = archive.entry_names.len(),
        bytes = archive.bytes.len(),
        "Built subject archive"
    );

    let file_name = archive_file_name(&subject.name);
    let length = archive.bytes.len();

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/zip")),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(Disposition::Attachment, &file_name),
            ),
            (header::CONTENT_LENGTH, HeaderValue::from(length)),
        ],
        chunked_body(Bytes::from(archive.bytes)),
    )
        .into_response())
}
