use std::sync::Arc;

use lingo_core::model::LanguageCode;
use services::{AppServices, SessionController};

pub trait UiApp: Send + Sync {
    fn services(&self) -> Arc<AppServices>;

    /// Language to open with instead of the stored one, if any.
    fn preferred_language(&self) -> Option<LanguageCode>;
}

#[derive(Clone)]
pub struct AppContext {
    services: Arc<AppServices>,
    preferred_language: Option<LanguageCode>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            services: app.services(),
            preferred_language: app.preferred_language(),
        }
    }

    #[must_use]
    pub fn services(&self) -> Arc<AppServices> {
        Arc::clone(&self.services)
    }

    #[must_use]
    pub fn preferred_language(&self) -> Option<LanguageCode> {
        self.preferred_language.clone()
    }

    /// A fresh controller; each mounted lesson view owns one.
    #[must_use]
    pub fn controller(&self) -> SessionController {
        self.services.controller()
    }

    /// Lesson service base URL as shown in the footer.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.services
            .settings()
            .base_url()
            .as_str()
            .trim_end_matches('/')
            .to_string()
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
