//! Lesson session controller.
//!
//! Wraps the pure `Session` state machine with the lesson service and local
//! persistence. Every network operation is split into a request (stamped with
//! a ticket, holding no borrow of the controller), its response, and a
//! synchronous apply step, so callers that keep the controller in shared UI
//! state never hold it across an await. The `async` convenience methods run
//! all three steps in order.

use std::sync::Arc;

use lingo_core::model::{LanguageCode, ProgressMap, ProgressRecord, Score};
use lingo_core::{Applied, AskTicket, Clock, LoadTicket, LoadedLesson, Session, Submission};
use storage::LocalStore;
use storage::repository::StorageError;
use tracing::{debug, info, warn};

use crate::error::{ControllerError, RemoteError};
use crate::remote::{LessonApi, fetch_lesson_and_quiz};

//
// ─── REQUESTS AND RESPONSES ────────────────────────────────────────────────────
//

/// A lesson + quiz fetch that has been issued but not yet sent.
pub struct LoadRequest {
    ticket: LoadTicket,
    api: Arc<dyn LessonApi>,
}

impl LoadRequest {
    #[must_use]
    pub fn ticket(&self) -> &LoadTicket {
        &self.ticket
    }

    pub async fn send(self) -> LoadResponse {
        let result = fetch_lesson_and_quiz(self.api.as_ref(), self.ticket.language()).await;
        LoadResponse {
            ticket: self.ticket,
            result,
        }
    }
}

pub struct LoadResponse {
    ticket: LoadTicket,
    result: Result<LoadedLesson, RemoteError>,
}

impl LoadResponse {
    #[must_use]
    pub fn new(ticket: LoadTicket, result: Result<LoadedLesson, RemoteError>) -> Self {
        Self { ticket, result }
    }
}

pub struct AskRequest {
    ticket: AskTicket,
    api: Arc<dyn LessonApi>,
}

impl AskRequest {
    #[must_use]
    pub fn ticket(&self) -> &AskTicket {
        &self.ticket
    }

    pub async fn send(self) -> AskResponse {
        let result = self.api.submit_question(self.ticket.question()).await;
        AskResponse {
            ticket: self.ticket,
            result,
        }
    }
}

pub struct AskResponse {
    ticket: AskTicket,
    result: Result<String, RemoteError>,
}

//
// ─── PERSISTENCE ───────────────────────────────────────────────────────────────
//

enum PendingWrite {
    LastLanguage(LanguageCode),
    Progress(ProgressMap),
}

/// A local-store write produced by a transition, to be committed by the caller.
#[must_use = "the write is only persisted once committed"]
pub struct StoreWrite {
    store: LocalStore,
    write: PendingWrite,
}

impl StoreWrite {
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    pub async fn commit(self) -> Result<(), StorageError> {
        match &self.write {
            PendingWrite::LastLanguage(language) => {
                self.store.save_last_language(language).await
            }
            PendingWrite::Progress(progress) => self.store.save_progress(progress).await,
        }
    }

    /// Commits and reports success, logging a failure instead of returning it.
    pub async fn commit_logged(self) -> bool {
        let what = match &self.write {
            PendingWrite::LastLanguage(_) => "last lesson language",
            PendingWrite::Progress(_) => "progress",
        };
        match self.commit().await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "failed to persist {what}");
                false
            }
        }
    }
}

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Result of applying a load response.
pub struct LoadOutcome {
    pub applied: Applied,
    pub write: Option<StoreWrite>,
}

/// Result of scoring a quiz, before persistence.
pub struct SubmitOutcome {
    pub submission: Submission,
    pub write: StoreWrite,
}

/// Result of a submission after the progress write was attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResult {
    pub score: Score,
    pub record: ProgressRecord,
    pub persisted: bool,
}

/// Persisted state read at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Startup {
    pub progress: ProgressMap,
    pub language: LanguageCode,
}

/// Reads persisted progress and the language to open with.
///
/// `preferred` wins over the stored language, which wins over the default.
/// Unreadable or corrupt values are logged and replaced by defaults.
pub async fn load_startup(store: &LocalStore, preferred: Option<LanguageCode>) -> Startup {
    let progress = store.load_progress().await.unwrap_or_else(|err| {
        warn!(error = %err, "ignoring unreadable progress");
        ProgressMap::new()
    });

    let stored = match preferred {
        Some(language) => Some(language),
        None => store.last_language().await.unwrap_or_else(|err| {
            warn!(error = %err, "ignoring unreadable last lesson language");
            None
        }),
    };

    Startup {
        progress,
        language: stored.unwrap_or_default(),
    }
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Owner of the session state and sole driver of its transitions.
pub struct SessionController {
    session: Session,
    api: Arc<dyn LessonApi>,
    store: LocalStore,
    clock: Clock,
}

impl SessionController {
    #[must_use]
    pub fn new(api: Arc<dyn LessonApi>, store: LocalStore, clock: Clock) -> Self {
        Self {
            session: Session::default(),
            api,
            store,
            clock,
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// Restores persisted progress and loads the startup language.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Remote` if the first lesson cannot be loaded;
    /// the session is then in the error phase.
    pub async fn initialize(
        &mut self,
        preferred: Option<LanguageCode>,
    ) -> Result<Applied, ControllerError> {
        let startup = load_startup(&self.store, preferred).await;
        self.restore(startup.progress);
        self.load_lesson(startup.language).await
    }

    /// Replaces the session with a fresh one seeded with `progress`.
    pub fn restore(&mut self, progress: ProgressMap) {
        debug!(languages = progress.len(), "restored progress");
        self.session = Session::new(progress);
    }

    // ── lesson loading ──────────────────────────────────────────────────────

    /// Enters loading for `language`, superseding any load in flight.
    pub fn begin_load(&mut self, language: LanguageCode) -> LoadRequest {
        let ticket = self.session.begin_load(language);
        debug!(
            language = %ticket.language(),
            generation = ticket.generation(),
            "loading lesson"
        );
        LoadRequest {
            ticket,
            api: Arc::clone(&self.api),
        }
    }

    /// Re-issues a load for the language a retry should target.
    pub fn retry(&mut self) -> LoadRequest {
        let language = self.session.retry_language();
        self.begin_load(language)
    }

    /// Applies a load response. Stale responses are dropped.
    ///
    /// On success the returned write records the language as last used.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Remote` when the current load failed; the
    /// session is then in the error phase with the previous lesson kept.
    pub fn finish_load(&mut self, response: LoadResponse) -> Result<LoadOutcome, ControllerError> {
        let LoadResponse { ticket, result } = response;
        match result {
            Ok(loaded) => {
                let unanswerable = loaded.quiz.unanswerable();
                let applied = self.session.finish_load::<RemoteError>(&ticket, Ok(loaded));
                if applied == Applied::Stale {
                    debug!(language = %ticket.language(), "dropping stale lesson");
                    return Ok(LoadOutcome {
                        applied,
                        write: None,
                    });
                }
                if !unanswerable.is_empty() {
                    warn!(
                        language = %ticket.language(),
                        questions = ?unanswerable,
                        "quiz has questions whose answer is not among the options"
                    );
                }
                info!(
                    language = %ticket.language(),
                    questions = self.session.quiz().len(),
                    "lesson ready"
                );
                Ok(LoadOutcome {
                    applied,
                    write: Some(StoreWrite {
                        store: self.store.clone(),
                        write: PendingWrite::LastLanguage(ticket.language().clone()),
                    }),
                })
            }
            Err(err) => {
                let applied = self.session.finish_load(&ticket, Err(()));
                if applied == Applied::Stale {
                    debug!(language = %ticket.language(), error = %err, "dropping stale failure");
                    return Ok(LoadOutcome {
                        applied,
                        write: None,
                    });
                }
                warn!(language = %ticket.language(), error = %err, "could not load lesson");
                Err(err.into())
            }
        }
    }

    /// Loads `language` end to end: fetch, apply, persist the language.
    ///
    /// # Errors
    ///
    /// See [`SessionController::finish_load`].
    pub async fn load_lesson(&mut self, language: LanguageCode) -> Result<Applied, ControllerError> {
        let response = self.begin_load(language).send().await;
        self.settle_load(response).await
    }

    /// Retries end to end.
    ///
    /// # Errors
    ///
    /// See [`SessionController::finish_load`].
    pub async fn retry_load(&mut self) -> Result<Applied, ControllerError> {
        let response = self.retry().send().await;
        self.settle_load(response).await
    }

    async fn settle_load(&mut self, response: LoadResponse) -> Result<Applied, ControllerError> {
        let outcome = self.finish_load(response)?;
        if let Some(write) = outcome.write {
            write.commit_logged().await;
        }
        Ok(outcome.applied)
    }

    // ── quiz ────────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `ControllerError::Session` outside the ready phase or for an
    /// index past the quiz.
    pub fn select_answer(
        &mut self,
        index: usize,
        option: impl Into<String>,
    ) -> Result<(), ControllerError> {
        self.session.select_answer(index, option)?;
        Ok(())
    }

    /// Scores the quiz. The returned write carries the progress map with the
    /// new record; commit it, then pass the submission to
    /// [`SessionController::finish_submit`] to show the score.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Validation` for an empty quiz and
    /// `ControllerError::Session` outside the ready phase or while an earlier
    /// submission is still being saved.
    pub fn submit(&mut self) -> Result<SubmitOutcome, ControllerError> {
        let submission = self.session.begin_submit(self.clock.now())?;
        info!(
            language = submission.key.as_str(),
            score = %submission.score,
            "quiz submitted"
        );
        let progress = self.session.progress_with(&submission);
        Ok(SubmitOutcome {
            submission,
            write: StoreWrite {
                store: self.store.clone(),
                write: PendingWrite::Progress(progress),
            },
        })
    }

    /// Shows the score of a submission whose progress write has completed.
    pub fn finish_submit(&mut self, submission: &Submission) -> Applied {
        let applied = self.session.finish_submit(submission);
        if applied == Applied::Stale {
            debug!(
                language = submission.key.as_str(),
                "submission finished after a language switch"
            );
        }
        applied
    }

    /// Scores the quiz, persists the progress map, then shows the score.
    ///
    /// A failed write is logged and reported through `SubmitResult::persisted`;
    /// the score is still shown.
    ///
    /// # Errors
    ///
    /// See [`SessionController::submit`].
    pub async fn submit_quiz(&mut self) -> Result<SubmitResult, ControllerError> {
        let SubmitOutcome { submission, write } = self.submit()?;
        let persisted = write.commit_logged().await;
        self.finish_submit(&submission);
        Ok(SubmitResult {
            score: submission.score,
            record: submission.record,
            persisted,
        })
    }

    /// # Errors
    ///
    /// Returns `ControllerError::Session` unless a result is showing.
    pub fn dismiss_result(&mut self) -> Result<(), ControllerError> {
        self.session.dismiss_result()?;
        Ok(())
    }

    // ── ask AI ──────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `ControllerError::Validation` for blank input; nothing is sent.
    pub fn begin_ask(&mut self, question: &str) -> Result<AskRequest, ControllerError> {
        let ticket = self.session.begin_ask(question)?;
        Ok(AskRequest {
            ticket,
            api: Arc::clone(&self.api),
        })
    }

    pub fn finish_ask(&mut self, response: AskResponse) -> Applied {
        let AskResponse { ticket, result } = response;
        if let Err(err) = &result {
            warn!(error = %err, "ask AI request failed");
        }
        let applied = self.session.finish_ask(&ticket, result);
        if applied == Applied::Stale {
            debug!(generation = ticket.generation(), "dropping stale AI answer");
        }
        applied
    }

    /// Asks end to end. A failed request shows the error placeholder and is
    /// not returned as an error.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Validation` for blank input.
    pub async fn ask_ai(&mut self, question: &str) -> Result<Applied, ControllerError> {
        let response = self.begin_ask(question)?.send().await;
        Ok(self.finish_ask(response))
    }

    pub fn clear_ai(&mut self) {
        self.session.clear_ai();
    }
}
