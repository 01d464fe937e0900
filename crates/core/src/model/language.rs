use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Language requested when nothing has been stored yet.
pub const DEFAULT_LANGUAGE: &str = "english";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LanguageError {
    #[error("language code cannot be empty")]
    Empty,

    #[error("language code contains a reserved character: {0:?}")]
    ReservedCharacter(char),
}

/// Lowercased language identifier used in request paths and as the progress key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Normalizes `raw` (trimmed, lowercased) into a language code.
    ///
    /// # Errors
    ///
    /// Returns `LanguageError::Empty` for blank input and
    /// `LanguageError::ReservedCharacter` for `/`, `?` or `#`.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, LanguageError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(LanguageError::Empty);
        }
        if let Some(ch) = normalized.chars().find(|ch| matches!(ch, '/' | '?' | '#')) {
            return Err(LanguageError::ReservedCharacter(ch));
        }
        Ok(Self(normalized))
    }

    #[must_use]
    pub fn default_language() -> Self {
        Self(DEFAULT_LANGUAGE.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self::default_language()
    }
}

impl fmt::Debug for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LanguageCode({})", self.0)
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LanguageCode {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        let code = LanguageCode::new("  Tamil ").unwrap();
        assert_eq!(code.as_str(), "tamil");
        assert_eq!(code.to_string(), "tamil");
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(LanguageCode::new("   "), Err(LanguageError::Empty));
    }

    #[test]
    fn rejects_path_characters() {
        assert_eq!(
            "en/../admin".parse::<LanguageCode>(),
            Err(LanguageError::ReservedCharacter('/'))
        );
    }

    #[test]
    fn default_is_english() {
        assert_eq!(LanguageCode::default().as_str(), DEFAULT_LANGUAGE);
    }
}
