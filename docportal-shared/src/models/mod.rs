/// Database models for DocPortal
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Portal accounts with an `admin` or `viewer` role
/// - `subject`: Top-level grouping of lessons and documents
/// - `lesson`: Grouping of documents nested under a subject
/// - `document`: Stored binary files with metadata
///
/// Parent/child links are plain UUID columns. Cascading deletes live in
/// [`subject::Subject::delete`] and [`lesson::Lesson::delete`].
///
/// # Example
///
/// ```no_run
/// use docportal_shared::models::subject::{CreateSubject, Subject};
/// use docportal_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let subject = Subject::create(&pool, CreateSubject {
///     name: "Mathematics".to_string(),
///     description: Some("Algebra and calculus".to_string()),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod document;
pub mod lesson;
pub mod subject;
pub mod user;
