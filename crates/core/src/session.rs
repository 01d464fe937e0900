//! Lesson session state machine.
//!
//! `Session` holds everything the controller mutates: the current lesson and
//! quiz, the user's selections, the progress map and the ask-AI answer. Every
//! transition leaves it in a consistent snapshot; I/O lives in the services
//! layer, which issues requests through tickets and feeds the results back.
//!
//! Phases: `Loading -> Ready -> Submitted -> Ready`, with `Error` reachable
//! only from `Loading`. A submission is scored in `Ready`, persisted by the
//! caller, and only then moves the session to `Submitted`.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{
    LanguageCode, Lesson, ProgressMap, ProgressRecord, Quiz, Score, SelectedAnswers,
    ValidationError, require_question,
};

/// Message shown when a lesson or quiz cannot be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Could not load lesson. Check backend & network.";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("{action} is not allowed while {phase}")]
    InvalidPhase {
        action: &'static str,
        phase: &'static str,
    },

    #[error("question {index} is out of range (quiz has {len} questions)")]
    QuestionOutOfRange { index: usize, len: usize },

    #[error("the previous submission is still being saved")]
    SubmitPending,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Ready,
    Submitted { score: Score },
    Error { message: String },
}

impl SessionPhase {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SessionPhase::Loading => "loading",
            SessionPhase::Ready => "ready",
            SessionPhase::Submitted { .. } => "submitted",
            SessionPhase::Error { .. } => "error",
        }
    }
}

/// State of the ask-AI box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AiAnswer {
    #[default]
    Empty,
    Pending,
    Answered(String),
    Failed,
}

impl AiAnswer {
    /// Text to display, `None` when the box is empty.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            AiAnswer::Empty => None,
            AiAnswer::Pending => Some("Thinking..."),
            AiAnswer::Answered(text) if text.trim().is_empty() => Some("No response"),
            AiAnswer::Answered(text) => Some(text),
            AiAnswer::Failed => Some("Error fetching AI response"),
        }
    }
}

//
// ─── TICKETS ───────────────────────────────────────────────────────────────────
//

/// Stamp carried by a lesson load. Only the latest ticket's result is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    language: LanguageCode,
}

impl LoadTicket {
    #[must_use]
    pub fn language(&self) -> &LanguageCode {
        &self.language
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Stamp carried by an ask-AI request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskTicket {
    generation: u64,
    question: String,
}

impl AskTicket {
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Whether a response was applied or dropped because a newer request superseded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    Stale,
}

/// Lesson and quiz fetched together for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedLesson {
    pub lesson: Lesson,
    pub quiz: Quiz,
}

/// Outcome of a quiz submission, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub key: String,
    pub score: Score,
    pub record: ProgressRecord,
    generation: u64,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
pub struct Session {
    phase: SessionPhase,
    lesson: Option<Lesson>,
    quiz: Quiz,
    selected: SelectedAnswers,
    progress: ProgressMap,
    last_score: Option<u32>,
    requested: Option<LanguageCode>,
    load_generation: u64,
    submit_pending: bool,
    ai_answer: AiAnswer,
    ai_notice: Option<ValidationError>,
    ask_generation: u64,
}

impl Session {
    /// A session that has not loaded anything yet, seeded with persisted progress.
    #[must_use]
    pub fn new(progress: ProgressMap) -> Self {
        Self {
            phase: SessionPhase::Loading,
            lesson: None,
            quiz: Quiz::default(),
            selected: SelectedAnswers::new(),
            progress,
            last_score: None,
            requested: None,
            load_generation: 0,
            submit_pending: false,
            ai_answer: AiAnswer::Empty,
            ai_notice: None,
            ask_generation: 0,
        }
    }

    // ── lesson loading ──────────────────────────────────────────────────────

    /// Enters `Loading` for `language` and supersedes any load in flight.
    ///
    /// Selections and the ask-AI answer are cleared; the previous lesson,
    /// quiz and progress stay in place until a result is applied.
    pub fn begin_load(&mut self, language: LanguageCode) -> LoadTicket {
        self.load_generation += 1;
        self.ask_generation += 1;
        self.submit_pending = false;
        self.phase = SessionPhase::Loading;
        self.selected.clear();
        self.ai_answer = AiAnswer::Empty;
        self.ai_notice = None;
        self.requested = Some(language.clone());
        LoadTicket {
            generation: self.load_generation,
            language,
        }
    }

    /// Applies the result of the load stamped with `ticket`.
    ///
    /// Results from superseded tickets are dropped and reported as `Applied::Stale`.
    /// A failure moves to `Error` with `LOAD_FAILED_MESSAGE`, keeping the
    /// previous lesson and quiz.
    pub fn finish_load<E>(&mut self, ticket: &LoadTicket, result: Result<LoadedLesson, E>) -> Applied {
        if ticket.generation != self.load_generation {
            return Applied::Stale;
        }

        match result {
            Ok(LoadedLesson { lesson, quiz }) => {
                let key = lesson
                    .progress_key()
                    .unwrap_or_else(|| ticket.language.as_str().to_string());
                self.last_score = self.progress.get(&key).map(|p| p.last_score);
                self.lesson = Some(lesson);
                self.quiz = quiz;
                self.selected.clear();
                self.phase = SessionPhase::Ready;
            }
            Err(_) => {
                self.phase = SessionPhase::Error {
                    message: LOAD_FAILED_MESSAGE.to_string(),
                };
            }
        }
        Applied::Current
    }

    /// Language a retry should request: the held lesson's language, else the
    /// last requested one, else the default.
    #[must_use]
    pub fn retry_language(&self) -> LanguageCode {
        self.lesson
            .as_ref()
            .and_then(Lesson::language_code)
            .or_else(|| self.requested.clone())
            .unwrap_or_default()
    }

    // ── answering ───────────────────────────────────────────────────────────

    /// Records `option` for question `index`, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside `Ready`,
    /// `SessionError::SubmitPending` while a submission is being saved and
    /// `SessionError::QuestionOutOfRange` for an index past the quiz.
    pub fn select_answer(
        &mut self,
        index: usize,
        option: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.require_ready("selecting an answer")?;
        if self.submit_pending {
            return Err(SessionError::SubmitPending);
        }
        if index >= self.quiz.len() {
            return Err(SessionError::QuestionOutOfRange {
                index,
                len: self.quiz.len(),
            });
        }
        self.selected.select(index, option);
        Ok(())
    }

    /// Scores the quiz without changing what is shown.
    ///
    /// The session stays in `Ready` with the submission pending until
    /// [`Session::finish_submit`]; a second submission is refused meanwhile.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside `Ready`,
    /// `SessionError::SubmitPending` while an earlier submission is unfinished and
    /// `ValidationError::EmptyQuiz` when there are no questions.
    pub fn begin_submit(&mut self, at: DateTime<Utc>) -> Result<Submission, SessionError> {
        self.require_ready("submitting")?;
        if self.submit_pending {
            return Err(SessionError::SubmitPending);
        }
        if self.quiz.is_empty() {
            return Err(ValidationError::EmptyQuiz.into());
        }

        let score = self.quiz.score(&self.selected);
        let key = self
            .lesson
            .as_ref()
            .and_then(Lesson::progress_key)
            .unwrap_or_else(|| self.retry_language().as_str().to_string());

        self.submit_pending = true;
        Ok(Submission {
            key,
            score,
            record: ProgressRecord::completed(score, at),
            generation: self.load_generation,
        })
    }

    /// Progress map as it will read once `submission` is applied.
    #[must_use]
    pub fn progress_with(&self, submission: &Submission) -> ProgressMap {
        let mut progress = self.progress.clone();
        progress.record(submission.key.clone(), submission.record);
        progress
    }

    /// Merges the submitted record into the progress map and shows the score.
    ///
    /// The record is merged even when a language switch superseded the
    /// submission; the result is then not shown and `Applied::Stale` is returned.
    pub fn finish_submit(&mut self, submission: &Submission) -> Applied {
        self.progress.record(submission.key.clone(), submission.record);
        if submission.generation != self.load_generation {
            return Applied::Stale;
        }

        self.submit_pending = false;
        self.last_score = Some(submission.score.correct());
        self.phase = SessionPhase::Submitted {
            score: submission.score,
        };
        Applied::Current
    }

    /// Closes the result display.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` unless a result is showing.
    pub fn dismiss_result(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Submitted { .. } => {
                self.phase = SessionPhase::Ready;
                Ok(())
            }
            _ => Err(self.invalid_phase("dismissing the result")),
        }
    }

    // ── ask AI ──────────────────────────────────────────────────────────────

    /// Starts a question. Blank input sets a notice and leaves the answer alone.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyQuestion` for empty or whitespace-only input.
    pub fn begin_ask(&mut self, question: &str) -> Result<AskTicket, ValidationError> {
        if let Err(err) = require_question(question) {
            self.ai_notice = Some(err);
            return Err(err);
        }
        self.ask_generation += 1;
        self.ai_notice = None;
        self.ai_answer = AiAnswer::Pending;
        Ok(AskTicket {
            generation: self.ask_generation,
            question: question.to_string(),
        })
    }

    /// Applies the answer for `ticket` unless a newer question, a clear or a
    /// language switch superseded it.
    pub fn finish_ask<E>(&mut self, ticket: &AskTicket, result: Result<String, E>) -> Applied {
        if ticket.generation != self.ask_generation {
            return Applied::Stale;
        }
        self.ai_answer = match result {
            Ok(answer) => AiAnswer::Answered(answer),
            Err(_) => AiAnswer::Failed,
        };
        Applied::Current
    }

    pub fn clear_ai(&mut self) {
        self.ask_generation += 1;
        self.ai_answer = AiAnswer::Empty;
        self.ai_notice = None;
    }

    // ── accessors ───────────────────────────────────────────────────────────

    #[must_use]
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    #[must_use]
    pub fn lesson(&self) -> Option<&Lesson> {
        self.lesson.as_ref()
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn selected(&self) -> &SelectedAnswers {
        &self.selected
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressMap {
        &self.progress
    }

    /// Progress recorded for the language of the lesson on screen.
    #[must_use]
    pub fn progress_for_current(&self) -> Option<&ProgressRecord> {
        let key = self.lesson.as_ref()?.progress_key()?;
        self.progress.get(&key)
    }

    #[must_use]
    pub fn last_score(&self) -> Option<u32> {
        self.last_score
    }

    #[must_use]
    pub fn requested_language(&self) -> Option<&LanguageCode> {
        self.requested.as_ref()
    }

    #[must_use]
    pub fn ai_answer(&self) -> &AiAnswer {
        &self.ai_answer
    }

    #[must_use]
    pub fn ai_notice(&self) -> Option<ValidationError> {
        self.ai_notice
    }

    /// True between `begin_submit` and `finish_submit`.
    #[must_use]
    pub fn submit_pending(&self) -> bool {
        self.submit_pending
    }

    fn require_ready(&self, action: &'static str) -> Result<(), SessionError> {
        if self.phase == SessionPhase::Ready {
            Ok(())
        } else {
            Err(self.invalid_phase(action))
        }
    }

    fn invalid_phase(&self, action: &'static str) -> SessionError {
        SessionError::InvalidPhase {
            action,
            phase: self.phase.name(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ProgressMap::new())
    }
}
