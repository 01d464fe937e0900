use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Score;

/// Outcome of the most recent quiz attempt for one language.
///
/// Serialized in camelCase; `timestamp` is milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub last_score: u32,
    pub total_questions: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    /// Record for a submitted attempt.
    #[must_use]
    pub fn completed(score: Score, at: DateTime<Utc>) -> Self {
        Self {
            last_score: score.correct(),
            total_questions: score.total(),
            completed: true,
            timestamp: Some(at),
        }
    }
}

/// Progress per lowercased language key.
///
/// Keys are only ever added or overwritten; no history is retained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressMap {
    records: BTreeMap<String, ProgressRecord>,
}

impl ProgressMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ProgressRecord> {
        self.records.get(key)
    }

    /// Stores `record` under `key`, replacing any earlier attempt.
    pub fn record(&mut self, key: impl Into<String>, record: ProgressRecord) {
        self.records.insert(key.into(), record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProgressRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }
}
