/// Lesson endpoints
///
/// - `GET /api/subjects/:id/lessons` - Lessons of a subject, oldest first
/// - `POST /api/subjects/:id/lessons` - Add a lesson (admin)
/// - `GET /api/lessons/:id` - Lesson with its documents
/// - `PUT /api/lessons/:id` - Partial update (admin)
/// - `DELETE /api/lessons/:id` - Delete with its documents (admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    routes::{auth::MessageResponse, optional_text, subjects::subject_not_found},
};
use axum::{extract::State, http::StatusCode, Json};
use docportal_shared::models::{
    document::{Document, DocumentSummary},
    lesson::{CreateLesson, Lesson, UpdateLesson},
    subject::Subject,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLessonRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required (at most 200 characters)"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// Partial lesson update; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateLessonRequest {
    #[validate(length(min = 1, max = 200, message = "Title cannot be blank (at most 200 characters)"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

impl UpdateLessonRequest {
    fn normalize(self) -> Self {
        Self {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description.map(|d| d.trim().to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LessonDetail {
    pub lesson: Lesson,
    pub documents: Vec<DocumentSummary>,
}

fn lesson_not_found() -> ApiError {
    ApiError::NotFound("Lesson not found".to_string())
}

async fn ensure_subject(state: &AppState, id: Uuid) -> ApiResult<Subject> {
    Subject::find_by_id(&state.db, id)
        .await?
        .ok_or_else(subject_not_found)
}

/// List the lessons of a subject, oldest first
pub async fn list_lessons(
    State(state): State<AppState>,
    ApiPath(subject_id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<Lesson>>> {
    ensure_subject(&state, subject_id).await?;

    let lessons = Lesson::list_by_subject(&state.db, subject_id).await?;
    Ok(Json(lessons))
}

/// Add a lesson to a subject
///
/// ```text
/// POST /api/subjects/:id/lessons
/// Content-Type: application/json
///
/// { "title": "Week 1", "description": "Limits" }
/// ```
pub async fn create_lesson(
    State(state): State<AppState>,
    ApiPath(subject_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<CreateLessonRequest>,
) -> ApiResult<(StatusCode, Json<Lesson>)> {
    let req = CreateLessonRequest {
        title: req.title.trim().to_string(),
        description: optional_text(req.description),
    };
    req.validate()?;

    ensure_subject(&state, subject_id).await?;

    let lesson = Lesson::create(
        &state.db,
        CreateLesson {
            subject_id,
            title: req.title,
            description: req.description,
        },
    )
    .await?;

    tracing::info!(lesson_id = %lesson.id, subject_id = %subject_id, "Lesson created");

    Ok((StatusCode::CREATED, Json(lesson)))
}

/// Get a lesson with its document summaries
pub async fn get_lesson(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<LessonDetail>> {
    let lesson = Lesson::find_by_id(&state.db, id)
        .await?
        .ok_or_else(lesson_not_found)?;

    let documents = Document::list_by_lesson(&state.db, id).await?;

    Ok(Json(LessonDetail { lesson, documents }))
}

/// Update a lesson's title and/or description
pub async fn update_lesson(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateLessonRequest>,
) -> ApiResult<Json<Lesson>> {
    let req = req.normalize();
    req.validate()?;

    let lesson = Lesson::update(
        &state.db,
        id,
        UpdateLesson {
            title: req.title,
            description: req.description,
        },
    )
    .await?
    .ok_or_else(lesson_not_found)?;

    tracing::info!(lesson_id = %id, "Lesson updated");

    Ok(Json(lesson))
}

/// Delete a lesson and its documents
pub async fn delete_lesson(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let documents = Lesson::delete(&state.db, id)
        .await?
        .ok_or_else(lesson_not_found)?;

    tracing::info!(lesson_id = %id, documents, "Lesson deleted");

    Ok(MessageResponse::new("Lesson deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_blank_title_rejected() {
        let req = UpdateLessonRequest {
            title: Some("   ".to_string()),
            description: None,
        }
        .normalize();

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_request_empty_is_valid() {
        assert!(UpdateLessonRequest::default().normalize().validate().is_ok());
    }

    #[test]
    fn test_update_request_trims() {
        let req = UpdateLessonRequest {
            title: Some(" Week 2 ".to_string()),
            description: Some(" Derivatives ".to_string()),
        }
        .normalize();

        assert_eq!(req.title.as_deref(), Some("Week 2"));
        assert_eq!(req.description.as_deref(), Some("Derivatives"));
    }
}
