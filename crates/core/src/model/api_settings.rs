use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Validated connection settings for the lesson service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiSettings {
    base_url: Url,
    timeout: Duration,
}

#[derive(Clone, Debug, Default)]
pub struct ApiSettingsDraft {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiSettingsError {
    #[error("lesson service base URL is required")]
    MissingBaseUrl,
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("request timeout must be > 0")]
    InvalidTimeout,
}

impl ApiSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft.
    ///
    /// # Errors
    ///
    /// Returns `ApiSettingsError` if the base URL is missing, is not an
    /// absolute http(s) URL, or the timeout is zero.
    pub fn validate(self) -> Result<ApiSettings, ApiSettingsError> {
        let raw = self
            .base_url
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty())
            .ok_or(ApiSettingsError::MissingBaseUrl)?;

        let base_url =
            Url::parse(&raw).map_err(|_| ApiSettingsError::InvalidBaseUrl(raw.clone()))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(ApiSettingsError::InvalidBaseUrl(raw));
        }

        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ApiSettingsError::InvalidTimeout);
        }

        Ok(ApiSettings {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl ApiSettings {
    /// # Errors
    ///
    /// See [`ApiSettingsDraft::validate`].
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiSettingsError> {
        ApiSettingsDraft {
            base_url: Some(base_url.into()),
            timeout_secs: None,
        }
        .validate()
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.timeout = timeout;
        }
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Appends percent-encoded path segments to the base URL.
    ///
    /// A trailing empty segment produces a trailing slash.
    #[must_use]
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
