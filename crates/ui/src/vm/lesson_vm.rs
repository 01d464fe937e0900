use lingo_core::model::{Lesson, QuizQuestion, SelectedAnswers};
use lingo_core::{AiAnswer, Session, SessionPhase};

use crate::views::{ViewError, ViewState};

/// Languages offered as switch buttons: (label, code).
pub const LANGUAGE_CHOICES: [(&str, &str); 2] = [("English", "english"), ("Tamil", "tamil")];

/// Immediate feedback for a selected option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionFeedback {
    Neutral,
    Correct,
    Wrong,
}

impl OptionFeedback {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            OptionFeedback::Neutral => "option",
            OptionFeedback::Correct => "option option-correct",
            OptionFeedback::Wrong => "option option-wrong",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub text: String,
    pub selected: bool,
    pub feedback: OptionFeedback,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub index: usize,
    pub prompt: String,
    pub options: Vec<OptionVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub score_line: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageChoiceVm {
    pub label: &'static str,
    pub code: &'static str,
    pub active: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AiVm {
    /// Answer box text; `None` hides the box.
    pub text: Option<String>,
    pub notice: Option<String>,
    pub pending: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonVm {
    pub header: String,
    pub title: String,
    pub content: String,
    pub progress_line: String,
    pub languages: Vec<LanguageChoiceVm>,
    pub questions: Vec<QuestionVm>,
    /// A submission is being saved; the submit button is disabled.
    pub submitting: bool,
    pub result: Option<ResultVm>,
    pub ai: AiVm,
}

/// Maps the session to what the lesson screen renders.
///
/// Loading and the load error take the whole screen; the lesson, quiz, result
/// and ask box show otherwise.
#[must_use]
pub fn lesson_state(session: &Session) -> ViewState<LessonVm> {
    match session.phase() {
        SessionPhase::Loading => ViewState::Loading,
        SessionPhase::Error { message } => ViewState::Error(ViewError::Load {
            message: message.clone(),
        }),
        SessionPhase::Ready | SessionPhase::Submitted { .. } => match session.lesson() {
            Some(lesson) => ViewState::Ready(map_lesson(session, lesson)),
            None => ViewState::Error(ViewError::Unknown),
        },
    }
}

fn map_lesson(session: &Session, lesson: &Lesson) -> LessonVm {
    let active = session
        .requested_language()
        .map(|code| code.as_str().to_string())
        .or_else(|| lesson.progress_key());

    LessonVm {
        header: format!("{} • {}", lesson.language(), lesson.title()),
        title: lesson.title().to_string(),
        content: lesson.content().to_string(),
        progress_line: progress_line(session, lesson),
        languages: LANGUAGE_CHOICES
            .iter()
            .map(|&(label, code)| LanguageChoiceVm {
                label,
                code,
                active: active.as_deref() == Some(code),
            })
            .collect(),
        questions: session
            .quiz()
            .iter()
            .enumerate()
            .map(|(index, question)| map_question(index, question, session.selected()))
            .collect(),
        submitting: session.submit_pending(),
        result: match session.phase() {
            SessionPhase::Submitted { score } => Some(ResultVm {
                score_line: format!("Score: {} / {}", score.correct(), score.total()),
            }),
            _ => None,
        },
        ai: AiVm {
            text: session.ai_answer().text().map(str::to_string),
            notice: session.ai_notice().map(|notice| notice.to_string()),
            pending: matches!(session.ai_answer(), AiAnswer::Pending),
        },
    }
}

fn progress_line(session: &Session, lesson: &Lesson) -> String {
    let key = lesson.progress_key().unwrap_or_default();
    match session.progress_for_current() {
        None => format!("No attempts yet for {}", key.to_uppercase()),
        Some(record) => format!(
            "Last: {}/{} • {}",
            record.last_score,
            record.total_questions,
            if record.completed {
                "Completed"
            } else {
                "In progress"
            }
        ),
    }
}

fn map_question(index: usize, question: &QuizQuestion, selected: &SelectedAnswers) -> QuestionVm {
    let choice = selected.get(index);
    QuestionVm {
        index,
        prompt: format!("{}. {}", index + 1, question.question()),
        options: question
            .options()
            .iter()
            .map(|option| {
                let is_selected = choice == Some(option.as_str());
                let feedback = match (is_selected, question.is_correct(option)) {
                    (false, _) => OptionFeedback::Neutral,
                    (true, true) => OptionFeedback::Correct,
                    (true, false) => OptionFeedback::Wrong,
                };
                OptionVm {
                    text: option.clone(),
                    selected: is_selected,
                    feedback,
                }
            })
            .collect(),
    }
}
