use lingo_core::model::{Lesson, Quiz};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(super) struct LessonEnvelope {
    pub lesson: LessonPayload,
}

/// The service answers unknown languages with `{"lesson": {"error": ...}}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum LessonPayload {
    Missing { error: String },
    Found(Lesson),
}

#[derive(Debug, Deserialize)]
pub(super) struct QuizEnvelope {
    #[serde(default)]
    pub quiz: Option<Quiz>,
}

#[derive(Debug, Serialize)]
pub(super) struct ExplainRequest<'a> {
    pub question: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct ExplainResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_error_payload_is_missing() {
        let env: LessonEnvelope =
            serde_json::from_str(r#"{"lesson":{"error":"No lesson found for klingon"}}"#).unwrap();
        assert!(matches!(env.lesson, LessonPayload::Missing { error } if error.contains("klingon")));
    }

    #[test]
    fn lesson_payload_is_found() {
        let env: LessonEnvelope = serde_json::from_str(
            r#"{"lesson":{"language":"English","title":"Welcome","content":"Hello!","quiz_id":"quiz-eng-101"}}"#,
        )
        .unwrap();
        let LessonPayload::Found(lesson) = env.lesson else {
            panic!("expected a lesson");
        };
        assert_eq!(lesson.title(), "Welcome");
    }

    #[test]
    fn missing_lesson_field_fails_to_decode() {
        assert!(serde_json::from_str::<LessonEnvelope>(r#"{"message":"hi"}"#).is_err());
    }

    #[test]
    fn null_or_absent_quiz_is_empty() {
        let env: QuizEnvelope = serde_json::from_str(r#"{"quiz":null}"#).unwrap();
        assert!(env.quiz.is_none());
        let env: QuizEnvelope = serde_json::from_str(r"{}").unwrap();
        assert!(env.quiz.is_none());
        let env: QuizEnvelope = serde_json::from_str(r#"{"quiz":[]}"#).unwrap();
        assert!(env.quiz.unwrap().is_empty());
    }

    #[test]
    fn explain_request_shape() {
        let body = serde_json::to_value(ExplainRequest { question: "What is a noun?" }).unwrap();
        assert_eq!(body, serde_json::json!({ "question": "What is a noun?" }));
    }
}
