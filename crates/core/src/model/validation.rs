use thiserror::Error;

/// Input rejected on the client before anything is sent or recorded.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("Enter a question first!")]
    EmptyQuestion,
    #[error("No quiz available for this lesson.")]
    EmptyQuiz,
}

/// Returns the question unchanged if it has visible content.
///
/// # Errors
///
/// Returns `ValidationError::EmptyQuestion` for empty or whitespace-only input.
pub fn require_question(text: &str) -> Result<&str, ValidationError> {
    if text.trim().is_empty() {
        Err(ValidationError::EmptyQuestion)
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_question_is_rejected() {
        assert_eq!(require_question("  \t"), Err(ValidationError::EmptyQuestion));
        assert_eq!(require_question(" what is a noun? "), Ok(" what is a noun? "));
    }
}
