use std::sync::Arc;

use lingo_core::model::{ApiSettings, ApiSettingsDraft};
use storage::LocalStore;
use storage::repository::Storage;

use crate::Clock;
use crate::controller::SessionController;
use crate::error::AppServicesError;
use crate::remote::{HttpLessonApi, LessonApi};

/// Assembles the lesson client and local store the controller runs on.
#[derive(Clone)]
pub struct AppServices {
    settings: ApiSettings,
    clock: Clock,
    api: Arc<dyn LessonApi>,
    store: LocalStore,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP lesson client.
    ///
    /// The settings are validated before the database is opened.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Settings` for a missing or invalid base URL or
    /// timeout, and other `AppServicesError` variants if storage or the HTTP
    /// client cannot be initialized.
    pub async fn new_sqlite(
        db_url: &str,
        settings: ApiSettingsDraft,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let settings = settings.validate()?;
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, settings, clock)
    }

    /// # Errors
    ///
    /// Returns `AppServicesError::Remote` if the HTTP client cannot be built.
    pub fn from_storage(
        storage: &Storage,
        settings: ApiSettings,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let api: Arc<dyn LessonApi> = Arc::new(HttpLessonApi::new(settings.clone())?);
        Ok(Self::with_api(storage, settings, clock, api))
    }

    /// Services over a caller-provided lesson client.
    #[must_use]
    pub fn with_api(
        storage: &Storage,
        settings: ApiSettings,
        clock: Clock,
        api: Arc<dyn LessonApi>,
    ) -> Self {
        Self {
            settings,
            clock,
            api,
            store: LocalStore::from_storage(storage),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    #[must_use]
    pub fn store(&self) -> LocalStore {
        self.store.clone()
    }

    #[must_use]
    pub fn api(&self) -> Arc<dyn LessonApi> {
        Arc::clone(&self.api)
    }

    /// A controller with an empty session; call `initialize` or `restore` next.
    #[must_use]
    pub fn controller(&self) -> SessionController {
        SessionController::new(Arc::clone(&self.api), self.store.clone(), self.clock)
    }
}

#[cfg(test)]
mod tests {
    use lingo_core::model::ApiSettingsError;
    use lingo_core::time::fixed_clock;

    use super::*;

    #[tokio::test]
    async fn invalid_settings_fail_before_storage_opens() {
        let err = AppServices::new_sqlite(
            "sqlite://does/not/matter.sqlite3",
            ApiSettingsDraft::default(),
            fixed_clock(),
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(
            err,
            AppServicesError::Settings(ApiSettingsError::MissingBaseUrl)
        ));
    }

    #[tokio::test]
    async fn valid_settings_reach_the_controller() {
        let draft = ApiSettingsDraft {
            base_url: Some("http://localhost:8000".into()),
            timeout_secs: Some(3),
        };
        let services = AppServices::new_sqlite(
            "sqlite:file:memdb_app_services?mode=memory&cache=shared",
            draft,
            fixed_clock(),
        )
        .await
        .unwrap();
        assert_eq!(services.settings().base_url().as_str(), "http://localhost:8000/");
        assert!(services.controller().session().lesson().is_none());
    }
}
