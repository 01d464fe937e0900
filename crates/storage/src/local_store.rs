//! Typed access to the two persisted values: the last lesson language and
//! the progress map.

use std::sync::Arc;

use lingo_core::model::{LanguageCode, ProgressMap};

use crate::repository::{KeyValueStore, Storage, StorageError};

/// Key holding the raw language code of the last loaded lesson.
pub const LAST_LESSON_LANG_KEY: &str = "lastLessonLang";
/// Key holding the JSON-serialized progress map.
pub const PROGRESS_KEY: &str = "progress";

#[derive(Clone)]
pub struct LocalStore {
    values: Arc<dyn KeyValueStore>,
}

impl LocalStore {
    #[must_use]
    pub fn new(values: Arc<dyn KeyValueStore>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(Arc::clone(&storage.values))
    }

    /// Last language a lesson was loaded for.
    ///
    /// A stored value that is not a valid language code reads as `None`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub async fn last_language(&self) -> Result<Option<LanguageCode>, StorageError> {
        let raw = self.values.get(LAST_LESSON_LANG_KEY).await?;
        Ok(raw.and_then(|value| LanguageCode::new(value).ok()))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    pub async fn save_last_language(&self, language: &LanguageCode) -> Result<(), StorageError> {
        self.values
            .set(LAST_LESSON_LANG_KEY, language.as_str())
            .await
    }

    /// Persisted progress, or an empty map when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored blob is not a
    /// progress map, or other storage errors.
    pub async fn load_progress(&self) -> Result<ProgressMap, StorageError> {
        let Some(raw) = self.values.get(PROGRESS_KEY).await? else {
            return Ok(ProgressMap::new());
        };
        serde_json::from_str(&raw).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Replaces the persisted progress map.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the map cannot be encoded or written.
    pub async fn save_progress(&self, progress: &ProgressMap) -> Result<(), StorageError> {
        let raw = serde_json::to_string(progress)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.values.set(PROGRESS_KEY, &raw).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the key cannot be removed.
    pub async fn clear_progress(&self) -> Result<(), StorageError> {
        self.values.remove(PROGRESS_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;
    use lingo_core::model::{ProgressRecord, Score};
    use lingo_core::time::fixed_now;

    fn store_with(entries: &[(&str, &str)]) -> (InMemoryStore, LocalStore) {
        let raw = InMemoryStore::with_entries(entries.iter().copied());
        let local = LocalStore::new(Arc::new(raw.clone()));
        (raw, local)
    }

    #[tokio::test]
    async fn missing_values_read_as_defaults() {
        let (_, local) = store_with(&[]);
        assert_eq!(local.last_language().await.unwrap(), None);
        assert!(local.load_progress().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn last_language_is_stored_raw() {
        let (raw, local) = store_with(&[]);
        let tamil = LanguageCode::new("tamil").unwrap();
        local.save_last_language(&tamil).await.unwrap();

        assert_eq!(
            raw.get(LAST_LESSON_LANG_KEY).await.unwrap().as_deref(),
            Some("tamil")
        );
        assert_eq!(local.last_language().await.unwrap(), Some(tamil));
    }

    #[tokio::test]
    async fn invalid_stored_language_reads_as_none() {
        let (_, local) = store_with(&[(LAST_LESSON_LANG_KEY, "   ")]);
        assert_eq!(local.last_language().await.unwrap(), None);
    }

    #[tokio::test]
    async fn loads_progress_written_by_earlier_versions() {
        let (_, local) = store_with(&[(
            PROGRESS_KEY,
            r#"{"english":{"lastScore":3,"totalQuestions":5,"completed":true,"timestamp":1700000000000}}"#,
        )]);
        let progress = local.load_progress().await.unwrap();
        let record = progress.get("english").unwrap();
        assert_eq!(record.last_score, 3);
        assert_eq!(record.total_questions, 5);
        assert_eq!(record.timestamp, Some(fixed_now()));
    }

    #[tokio::test]
    async fn progress_round_trips_and_clears() {
        let (raw, local) = store_with(&[]);
        let mut progress = ProgressMap::new();
        progress.record("tamil", ProgressRecord::completed(Score::new(2, 2), fixed_now()));

        local.save_progress(&progress).await.unwrap();
        assert!(raw.get(PROGRESS_KEY).await.unwrap().is_some());
        assert_eq!(local.load_progress().await.unwrap(), progress);

        local.clear_progress().await.unwrap();
        assert!(local.load_progress().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_progress_is_a_serialization_error() {
        let (_, local) = store_with(&[(PROGRESS_KEY, "not json")]);
        let err = local.load_progress().await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
