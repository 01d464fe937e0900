use std::sync::Arc;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use lingo_core::model::{ApiSettings, LanguageCode, Lesson, Quiz, QuizQuestion};
use lingo_core::time::fixed_clock;
use services::{AppServices, LessonApi, RemoteError};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::LessonView;

pub const TEST_BASE_URL: &str = "http://lessons.test";

/// Serves one English lesson; any other language fails like an offline backend.
pub struct StubApi;

#[async_trait]
impl LessonApi for StubApi {
    async fn fetch_lesson(&self, language: &LanguageCode) -> Result<Lesson, RemoteError> {
        match language.as_str() {
            "english" => Ok(Lesson::new("English", "Welcome to the Platform", "Nouns name things.")),
            other => Err(RemoteError::Service(format!("no route to {other}"))),
        }
    }

    async fn fetch_quiz(&self, _language: &LanguageCode) -> Result<Quiz, RemoteError> {
        Ok(Quiz::new(vec![QuizQuestion::new("1+1?", ["1", "2"], "2")]))
    }

    async fn submit_question(&self, question: &str) -> Result<String, RemoteError> {
        Ok(format!("About {question}"))
    }
}

struct TestApp {
    services: Arc<AppServices>,
    preferred_language: Option<LanguageCode>,
}

impl UiApp for TestApp {
    fn services(&self) -> Arc<AppServices> {
        Arc::clone(&self.services)
    }

    fn preferred_language(&self) -> Option<LanguageCode> {
        self.preferred_language.clone()
    }
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewHarnessRoot(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    rsx! { LessonView {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drives pending tasks until `needle` renders or the attempts run out.
    pub async fn drive_until(&mut self, needle: &str) -> String {
        for _ in 0..20 {
            let html = self.render();
            if html.contains(needle) {
                return html;
            }
            self.drive_async().await;
        }
        self.render()
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(preferred_language: Option<&str>) -> ViewHarness {
    let storage = Storage::in_memory();
    let settings = ApiSettings::new(TEST_BASE_URL).expect("test base url");
    let services = AppServices::with_api(&storage, settings, fixed_clock(), Arc::new(StubApi));
    let app = Arc::new(TestApp {
        services: Arc::new(services),
        preferred_language: preferred_language
            .map(|raw| LanguageCode::new(raw).expect("test language")),
    });

    let dom = VirtualDom::new_with_props(ViewHarnessRoot, ViewHarnessProps { app });
    ViewHarness { dom, storage }
}
