#![forbid(unsafe_code)]

pub mod app_services;
pub mod controller;
pub mod error;
pub mod remote;

pub use lingo_core::Clock;

pub use app_services::AppServices;
pub use controller::{
    AskRequest, AskResponse, LoadOutcome, LoadRequest, LoadResponse, SessionController, Startup,
    StoreWrite, SubmitOutcome, SubmitResult, load_startup,
};
pub use error::{AppServicesError, ControllerError, RemoteError};
pub use remote::{HttpLessonApi, LessonApi, fetch_lesson_and_quiz};
