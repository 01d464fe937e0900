//! Shared error types for the services crate.

use thiserror::Error;

use lingo_core::SessionError;
use lingo_core::model::{ApiSettingsError, ValidationError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `LessonApi` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemoteError {
    #[error("lesson service request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("lesson not found: {0}")]
    NotFound(String),
    #[error("lesson service error: {0}")]
    Service(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl RemoteError {
    /// True for failures of the request itself, as opposed to rejected input.
    #[must_use]
    pub fn is_network(&self) -> bool {
        !matches!(self, RemoteError::Validation(_))
    }
}

/// Errors emitted by `SessionController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ControllerError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Session(SessionError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<SessionError> for ControllerError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Validation(validation) => ControllerError::Validation(validation),
            other => ControllerError::Session(other),
        }
    }
}

impl ControllerError {
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ControllerError::Validation(_) | ControllerError::Remote(RemoteError::Validation(_))
        )
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Settings(#[from] ApiSettingsError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
