mod api_settings;
mod language;
mod lesson;
mod progress;
mod quiz;
mod validation;

pub use api_settings::{ApiSettings, ApiSettingsDraft, ApiSettingsError, DEFAULT_TIMEOUT_SECS};
pub use language::{DEFAULT_LANGUAGE, LanguageCode, LanguageError};
pub use lesson::Lesson;
pub use progress::{ProgressMap, ProgressRecord};
pub use quiz::{Quiz, QuizQuestion, Score, SelectedAnswers};
pub use validation::{ValidationError, require_question};
