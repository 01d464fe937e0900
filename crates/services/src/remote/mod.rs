//! Client side of the lesson service.

mod http;
mod wire;

use async_trait::async_trait;
use lingo_core::LoadedLesson;
use lingo_core::model::{LanguageCode, Lesson, Quiz};

use crate::error::RemoteError;

pub use http::HttpLessonApi;

/// Operations consumed from the lesson service. Implementations never retry.
#[async_trait]
pub trait LessonApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `RemoteError` on transport failure, a non-success status, or
    /// when the service reports no lesson for `language`.
    async fn fetch_lesson(&self, language: &LanguageCode) -> Result<Lesson, RemoteError>;

    /// An absent or empty quiz is a valid, empty result.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on transport failure or a non-success status.
    async fn fetch_quiz(&self, language: &LanguageCode) -> Result<Quiz, RemoteError>;

    /// # Errors
    ///
    /// Returns `RemoteError::Validation` for blank input without sending
    /// anything, or other `RemoteError`s when the request fails.
    async fn submit_question(&self, question: &str) -> Result<String, RemoteError>;
}

/// Fetches the lesson and then the quiz for `language`.
///
/// # Errors
///
/// Either failure fails the pair; which one failed is not distinguished.
pub async fn fetch_lesson_and_quiz(
    api: &dyn LessonApi,
    language: &LanguageCode,
) -> Result<LoadedLesson, RemoteError> {
    let lesson = api.fetch_lesson(language).await?;
    let quiz = api.fetch_quiz(language).await?;
    Ok(LoadedLesson { lesson, quiz })
}
