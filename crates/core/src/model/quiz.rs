use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

//
// ─── QUESTIONS ─────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
///
/// `answer` is expected to equal one of `options`. That is not enforced: a
/// question whose answer is missing from its options is kept and can never be
/// scored correct (see [`QuizQuestion::is_answerable`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    question: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    answer: String,
}

impl QuizQuestion {
    #[must_use]
    pub fn new<I, S>(question: impl Into<String>, options: I, answer: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            question: question.into(),
            options: options.into_iter().map(Into::into).collect(),
            answer: answer.into(),
        }
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn is_correct(&self, selected: &str) -> bool {
        selected == self.answer
    }

    /// True when the expected answer is one of the offered options.
    #[must_use]
    pub fn is_answerable(&self) -> bool {
        self.options.iter().any(|opt| *opt == self.answer)
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// Ordered questions for a lesson. Display order is index order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quiz {
    questions: Vec<QuizQuestion>,
}

impl Quiz {
    #[must_use]
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self { questions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&QuizQuestion> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuizQuestion> {
        self.questions.iter()
    }

    /// Indices of questions that can never be scored correct.
    #[must_use]
    pub fn unanswerable(&self) -> Vec<usize> {
        self.questions
            .iter()
            .enumerate()
            .filter(|(_, q)| !q.is_answerable())
            .map(|(i, _)| i)
            .collect()
    }

    /// Counts indices whose selection equals the expected answer.
    /// Unanswered questions count as wrong.
    #[must_use]
    pub fn score(&self, selected: &SelectedAnswers) -> Score {
        let correct = self
            .questions
            .iter()
            .enumerate()
            .filter(|(i, q)| selected.get(*i).is_some_and(|opt| q.is_correct(opt)))
            .count();
        Score::new(saturating_u32(correct), saturating_u32(self.questions.len()))
    }
}

impl From<Vec<QuizQuestion>> for Quiz {
    fn from(questions: Vec<QuizQuestion>) -> Self {
        Self::new(questions)
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

//
// ─── SELECTIONS ────────────────────────────────────────────────────────────────
//

/// Selected option text per question index. At most one selection per index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedAnswers {
    by_index: BTreeMap<usize, String>,
}

impl SelectedAnswers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `option` for `index`, replacing any earlier selection.
    pub fn select(&mut self, index: usize, option: impl Into<String>) {
        self.by_index.insert(index, option.into());
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.by_index.get(&index).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.by_index.iter().map(|(i, opt)| (*i, opt.as_str()))
    }

    pub(crate) fn clear(&mut self) {
        self.by_index.clear();
    }
}

impl<S: Into<String>> FromIterator<(usize, S)> for SelectedAnswers {
    fn from_iter<T: IntoIterator<Item = (usize, S)>>(iter: T) -> Self {
        let mut answers = Self::new();
        for (index, option) in iter {
            answers.select(index, option);
        }
        answers
    }
}

//
// ─── SCORE ─────────────────────────────────────────────────────────────────────
//

/// Result of scoring a quiz: `correct` never exceeds `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Score {
    correct: u32,
    total: u32,
}

impl Score {
    #[must_use]
    pub fn new(correct: u32, total: u32) -> Self {
        Self {
            correct: correct.min(total),
            total,
        }
    }

    #[must_use]
    pub fn correct(self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(self) -> u32 {
        self.total
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.correct, self.total)
    }
}
