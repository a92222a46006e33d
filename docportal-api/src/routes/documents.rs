/// Document endpoints
///
/// - `POST /api/documents` - Multipart upload (admin)
/// - `GET /api/documents/:id` - Serve the file (`?download=true` to save)
/// - `PUT /api/documents/:id` - Rename (admin)
/// - `DELETE /api/documents/:id` - Delete (admin)
///
/// # Upload Fields
///
/// | Field       | Required | Content                              |
/// |-------------|----------|--------------------------------------|
/// | `file`      | yes      | The file, with a filename            |
/// | `title`     | yes      | Display title                        |
/// | `subjectId` | yes      | Owning subject UUID                  |
/// | `lessonId`  | no       | Lesson UUID, must belong to subject  |

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiMultipart, ApiPath, ApiQuery},
    routes::{
        auth::MessageResponse, chunked_body, content_disposition, required_text, Disposition,
    },
};
use axum::{
    extract::{multipart::Field, Multipart, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use docportal_shared::models::{
    document::{sanitize_file_name, CreateDocument, Document, DocumentSummary, DEFAULT_FILE_TYPE},
    lesson::Lesson,
    subject::Subject,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Upload response
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub document_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServeQuery {
    /// `true` sends an attachment; any other value is inline
    pub download: Option<String>,
}

impl ServeQuery {
    fn disposition(&self) -> Disposition {
        match self.download.as_deref() {
            Some("true") => Disposition::Attachment,
            _ => Disposition::Inline,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDocumentRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required (at most 200 characters)"))]
    pub title: String,
}

/// A file part read from the upload
#[derive(Debug)]
struct UploadedFile {
    file_name: String,
    content_type: Option<String>,
    data: Bytes,
}

/// Raw multipart fields before validation
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    title: Option<String>,
    subject_id: Option<String>,
    lesson_id: Option<String>,
}

/// Validated upload
#[derive(Debug)]
struct ValidUpload {
    file: UploadedFile,
    title: String,
    subject_id: Uuid,
    lesson_id: Option<Uuid>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => form.file = Some(read_file(field).await?),
                "title" => form.title = Some(field.text().await?),
                "subjectId" => form.subject_id = Some(field.text().await?),
                "lessonId" => form.lesson_id = Some(field.text().await?),
                other => {
                    tracing::debug!(field = %other, "Ignoring unknown upload field");
                }
            }
        }

        Ok(form)
    }

    fn validate(self) -> ApiResult<ValidUpload> {
        let file = self
            .file
            .ok_or_else(|| ApiError::invalid_field("file", "File is required"))?;
        if sanitize_file_name(&file.file_name).is_empty() {
            return Err(ApiError::invalid_field("file", "File must have a name"));
        }

        let title = self
            .title
            .as_deref()
            .and_then(required_text)
            .ok_or_else(|| ApiError::invalid_field("title", "Title is required"))?;

        let subject_id = self
            .subject_id
            .as_deref()
            .and_then(required_text)
            .ok_or_else(|| ApiError::invalid_field("subjectId", "Subject is required"))?;
        let subject_id = Uuid::parse_str(&subject_id)
            .map_err(|_| ApiError::invalid_field("subjectId", "Subject ID must be a UUID"))?;

        let lesson_id = match self.lesson_id.as_deref().and_then(required_text) {
            Some(raw) => Some(
                Uuid::parse_str(&raw)
                    .map_err(|_| ApiError::invalid_field("lessonId", "Lesson ID must be a UUID"))?,
            ),
            None => None,
        };

        Ok(ValidUpload {
            file,
            title,
            subject_id,
            lesson_id,
        })
    }
}

async fn read_file(field: Field<'_>) -> ApiResult<UploadedFile> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);
    let data = field.bytes().await?;

    Ok(UploadedFile {
        file_name,
        content_type,
        data,
    })
}

fn document_not_found() -> ApiError {
    ApiError::NotFound("Document not found".to_string())
}

/// Upload a document
///
/// # Errors
///
/// - `400 Bad Request`: Missing field, malformed ID, or a lesson of
///   another subject
/// - `404 Not Found`: Unknown subject or lesson
/// - `413 Payload Too Large`: Body over the upload limit
pub async fn upload_document(
    State(state): State<AppState>,
    ApiMultipart(multipart): ApiMultipart,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let upload = UploadForm::read(multipart).await?.validate()?;

    if Subject::find_by_id(&state.db, upload.subject_id).await?.is_none() {
        return Err(ApiError::NotFound("Subject not found".to_string()));
    }

    if let Some(lesson_id) = upload.lesson_id {
        let lesson = Lesson::find_by_id(&state.db, lesson_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

        if lesson.subject_id != upload.subject_id {
            return Err(ApiError::BadRequest(
                "Lesson does not belong to the given subject".to_string(),
            ));
        }
    }

    let size = upload.file.data.len();
    let document = Document::create(
        &state.db,
        CreateDocument {
            subject_id: upload.subject_id,
            lesson_id: upload.lesson_id,
            title: upload.title,
            file_name: upload.file.file_name,
            file_type: upload.file.content_type.unwrap_or_default(),
            file_data: Vec::from(upload.file.data),
        },
    )
    .await?;

    tracing::info!(
        document_id = %document.id,
        subject_id = %document.subject_id,
        lesson_id = ?document.lesson_id,
        size,
        "Document uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "Document uploaded".to_string(),
            document_id: document.id,
        }),
    ))
}

/// Serve a document's bytes
///
/// Inline by default so browsers can preview it. Stored files are
/// untrusted, so the response is sandboxed.
pub async fn get_document(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<ServeQuery>,
) -> ApiResult<Response> {
    let document = Document::find_by_id(&state.db, id)
        .await?
        .ok_or_else(document_not_found)?;

    let disposition = query.disposition();

    let content_type = HeaderValue::from_str(&document.file_type)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_FILE_TYPE));
    let length = document.file_data.len();

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(disposition, &document.file_name),
            ),
            (header::CONTENT_LENGTH, HeaderValue::from(length)),
            (header::CONTENT_SECURITY_POLICY, HeaderValue::from_static("sandbox")),
        ],
        chunked_body(Bytes::from(document.file_data)),
    )
        .into_response())
}

/// Rename a document
pub async fn update_document(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateDocumentRequest>,
) -> ApiResult<Json<DocumentSummary>> {
    let req = UpdateDocumentRequest {
        title: req.title.trim().to_string(),
    };
    req.validate()?;

    let document = Document::update_title(&state.db, id, &req.title)
        .await?
        .ok_or_else(document_not_found)?;

    tracing::info!(document_id = %id, "Document renamed");

    Ok(Json(document))
}

/// Delete a document
pub async fn delete_document(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !Document::delete(&state.db, id).await? {
        return Err(document_not_found());
    }

    tracing::info!(document_id = %id, "Document deleted");

    Ok(MessageResponse::new("Document deleted"))
}
