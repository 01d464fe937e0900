use serde::{Deserialize, Serialize};

use crate::model::LanguageCode;

/// A lesson as served for one language. Replaced wholesale on every language switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(default)]
    language: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quiz_id: Option<String>,
}

impl Lesson {
    #[must_use]
    pub fn new(
        language: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            title: title.into(),
            content: content.into(),
            quiz_id: None,
        }
    }

    #[must_use]
    pub fn with_quiz_id(mut self, quiz_id: impl Into<String>) -> Self {
        self.quiz_id = Some(quiz_id.into());
        self
    }

    /// Display name of the language, e.g. `English`.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn quiz_id(&self) -> Option<&str> {
        self.quiz_id.as_deref()
    }

    /// Key under which progress for this lesson is recorded: the lowercased language name.
    ///
    /// Returns `None` when the served lesson carries no language.
    #[must_use]
    pub fn progress_key(&self) -> Option<String> {
        let key = self.language.trim().to_lowercase();
        (!key.is_empty()).then_some(key)
    }

    /// The language code this lesson can be re-requested with.
    #[must_use]
    pub fn language_code(&self) -> Option<LanguageCode> {
        LanguageCode::new(&self.language).ok()
    }
}
