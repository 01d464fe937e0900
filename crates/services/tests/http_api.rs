use std::time::Duration;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use lingo_core::model::{ApiSettings, LanguageCode, Lesson, ValidationError};
use serde_json::{Value, json};
use services::{HttpLessonApi, LessonApi, RemoteError, fetch_lesson_and_quiz};

async fn lesson(Path(lang): Path<String>) -> Json<Value> {
    match lang.as_str() {
        "english" => Json(json!({
            "lesson": {
                "language": "English",
                "title": "Welcome to the Platform",
                "content": "Nouns name things.",
                "quiz_id": "quiz-eng-101"
            }
        })),
        other => Json(json!({ "lesson": { "error": format!("No lesson found for {other}") } })),
    }
}

async fn quiz(Path(lang): Path<String>) -> Result<Json<Value>, StatusCode> {
    match lang.as_str() {
        "english" => Ok(Json(json!({
            "quiz": [
                { "question": "1+1?", "options": ["1", "2"], "answer": "2" },
                { "question": "Capital of France?", "options": ["Paris", "Rome"], "answer": "Paris" }
            ]
        }))),
        "spanish" => Ok(Json(json!({ "quiz": null }))),
        _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

async fn explain(Json(body): Json<Value>) -> Json<Value> {
    match body["question"].as_str() {
        Some("fail") => Json(json!({ "error": "model unavailable" })),
        Some("silent") => Json(json!({})),
        Some(question) => Json(json!({ "answer": format!("  You asked: {question}\n") })),
        None => Json(json!({ "error": "question is required" })),
    }
}

async fn spawn_stub() -> HttpLessonApi {
    let app = Router::new()
        .route("/lesson/{lang}", get(lesson))
        .route("/quiz/{lang}", get(quiz))
        .route("/explain-ai/", post(explain));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let settings = ApiSettings::new(format!("http://{addr}"))
        .unwrap()
        .with_timeout(Duration::from_secs(5));
    HttpLessonApi::new(settings).unwrap()
}

fn code(raw: &str) -> LanguageCode {
    LanguageCode::new(raw).unwrap()
}

#[tokio::test]
async fn fetches_lesson_and_quiz_together() {
    let api = spawn_stub().await;
    let loaded = fetch_lesson_and_quiz(&api, &code("English")).await.unwrap();

    assert_eq!(
        loaded.lesson,
        Lesson::new("English", "Welcome to the Platform", "Nouns name things.")
            .with_quiz_id("quiz-eng-101")
    );
    assert_eq!(loaded.quiz.len(), 2);
    assert_eq!(loaded.quiz.get(1).unwrap().answer(), "Paris");
}

#[tokio::test]
async fn lesson_error_body_maps_to_not_found() {
    let api = spawn_stub().await;
    let err = api.fetch_lesson(&code("klingon")).await.unwrap_err();
    assert!(matches!(err, RemoteError::NotFound(ref msg) if msg.contains("klingon")));
}

#[tokio::test]
async fn null_quiz_is_empty() {
    let api = spawn_stub().await;
    let quiz = api.fetch_quiz(&code("spanish")).await.unwrap();
    assert!(quiz.is_empty());
}

#[tokio::test]
async fn server_error_status_is_reported() {
    let api = spawn_stub().await;
    let err = api.fetch_quiz(&code("tamil")).await.unwrap_err();
    assert!(matches!(
        err,
        RemoteError::HttpStatus(StatusCode::INTERNAL_SERVER_ERROR)
    ));
    assert!(err.is_network());
}

#[tokio::test]
async fn answers_are_trimmed() {
    let api = spawn_stub().await;
    let answer = api.submit_question("What is a noun?").await.unwrap();
    assert_eq!(answer, "You asked: What is a noun?");
}

#[tokio::test]
async fn explain_error_and_empty_bodies() {
    let api = spawn_stub().await;
    let err = api.submit_question("fail").await.unwrap_err();
    assert!(matches!(err, RemoteError::Service(ref msg) if msg == "model unavailable"));

    assert_eq!(api.submit_question("silent").await.unwrap(), "");
}

#[tokio::test]
async fn blank_question_is_rejected_before_sending() {
    let api = spawn_stub().await;
    let err = api.submit_question(" \t ").await.unwrap_err();
    assert!(matches!(
        err,
        RemoteError::Validation(ValidationError::EmptyQuestion)
    ));
    assert!(!err.is_network());
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let settings = ApiSettings::new("http://127.0.0.1:9")
        .unwrap()
        .with_timeout(Duration::from_secs(2));
    let api = HttpLessonApi::new(settings).unwrap();
    let err = api.fetch_lesson(&code("english")).await.unwrap_err();
    assert!(matches!(err, RemoteError::Http(_)));
}
