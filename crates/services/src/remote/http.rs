use async_trait::async_trait;
use lingo_core::model::{ApiSettings, LanguageCode, Lesson, Quiz, require_question};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::LessonApi;
use super::wire::{ExplainRequest, ExplainResponse, LessonEnvelope, LessonPayload, QuizEnvelope};
use crate::error::RemoteError;

/// `LessonApi` over HTTP:
///
/// - `GET {base}/lesson/{language}` → `{ lesson }`
/// - `GET {base}/quiz/{language}` → `{ quiz }`
/// - `POST {base}/explain-ai/` with `{ question }` → `{ answer }`
#[derive(Clone)]
pub struct HttpLessonApi {
    client: Client,
    settings: ApiSettings,
}

impl HttpLessonApi {
    /// # Errors
    ///
    /// Returns `RemoteError::Http` if the HTTP client cannot be built.
    pub fn new(settings: ApiSettings) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(settings.timeout()).build()?;
        Ok(Self { client, settings })
    }

    #[must_use]
    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, RemoteError> {
        let url = self.settings.endpoint(segments);
        debug!(url = url.as_str(), "GET");
        let response = self.client.get(url).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
    if !response.status().is_success() {
        return Err(RemoteError::HttpStatus(response.status()));
    }
    Ok(response.json().await?)
}

#[async_trait]
impl LessonApi for HttpLessonApi {
    async fn fetch_lesson(&self, language: &LanguageCode) -> Result<Lesson, RemoteError> {
        let envelope: LessonEnvelope = self.get_json(&["lesson", language.as_str()]).await?;
        match envelope.lesson {
            LessonPayload::Found(lesson) => Ok(lesson),
            LessonPayload::Missing { error } => Err(RemoteError::NotFound(error)),
        }
    }

    async fn fetch_quiz(&self, language: &LanguageCode) -> Result<Quiz, RemoteError> {
        let envelope: QuizEnvelope = self.get_json(&["quiz", language.as_str()]).await?;
        Ok(envelope.quiz.unwrap_or_default())
    }

    async fn submit_question(&self, question: &str) -> Result<String, RemoteError> {
        let question = require_question(question)?;
        let url = self.settings.endpoint(&["explain-ai", ""]);
        debug!(url = url.as_str(), "POST");

        let response = self
            .client
            .post(url)
            .json(&ExplainRequest { question })
            .send()
            .await?;
        let body: ExplainResponse = decode(response).await?;

        match (body.answer, body.error) {
            (Some(answer), _) => Ok(answer.trim().to_string()),
            (None, Some(error)) => Err(RemoteError::Service(error)),
            (None, None) => Ok(String::new()),
        }
    }
}
