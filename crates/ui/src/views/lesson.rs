use dioxus::prelude::*;

use lingo_core::model::LanguageCode;
use services::{LoadOutcome, LoadRequest, SessionController, SubmitOutcome, load_startup};

use crate::context::AppContext;
use crate::views::ViewState;
use crate::vm::{AiVm, LessonVm, QuestionVm, lesson_state};

/// Sends a load and applies its response. The signal is only borrowed
/// between awaits.
async fn run_load(mut controller: Signal<SessionController>, request: LoadRequest) {
    let response = request.send().await;
    let outcome = controller.write().finish_load(response);
    if let Ok(LoadOutcome {
        write: Some(write), ..
    }) = outcome
    {
        write.commit_logged().await;
    }
}

#[component]
pub fn LessonView() -> Element {
    let ctx = use_context::<AppContext>();
    let mut controller = use_signal(|| ctx.controller());
    let base_url = ctx.base_url();

    use_hook(|| {
        let services = ctx.services();
        let preferred = ctx.preferred_language();
        spawn(async move {
            let startup = load_startup(&services.store(), preferred).await;
            controller.write().restore(startup.progress);
            let request = controller.write().begin_load(startup.language);
            run_load(controller, request).await;
        })
    });

    let state = lesson_state(controller.read().session());

    rsx! {
        div { class: "page lesson-page",
            match state {
                ViewState::Loading => rsx! {
                    div { class: "center",
                        div { class: "spinner" }
                        p { class: "muted", "Loading lesson..." }
                    }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "center",
                        p { class: "error-title", "Error" }
                        p { class: "error-details", "{err.message()}" }
                        button {
                            id: "lesson-retry",
                            onclick: move |_| {
                                let request = controller.write().retry();
                                spawn(run_load(controller, request));
                            },
                            "Retry"
                        }
                    }
                },
                ViewState::Ready(vm) => rsx! {
                    LessonBody { vm, controller }
                },
            }
            footer { class: "footer", "Connected via {base_url}" }
        }
    }
}

#[component]
fn LessonBody(vm: LessonVm, controller: Signal<SessionController>) -> Element {
    let mut controller = controller;
    let LessonVm {
        header,
        title,
        content,
        progress_line,
        languages,
        questions,
        submitting,
        result,
        ai,
    } = vm;

    rsx! {
        header { class: "header",
            h1 { "Multilingual Learning" }
            p { class: "muted", "{header}" }
        }

        section { class: "card",
            h2 { "{title}" }
            p { class: "lesson-content", "{content}" }
            p { class: "progress", "{progress_line}" }
            div { class: "lang-row",
                for choice in languages {
                    button {
                        key: "{choice.code}",
                        class: if choice.active { "lang active" } else { "lang" },
                        onclick: move |_| {
                            let Ok(language) = LanguageCode::new(choice.code) else {
                                return;
                            };
                            let request = controller.write().begin_load(language);
                            spawn(run_load(controller, request));
                        },
                        "{choice.label}"
                    }
                }
            }
        }

        QuizSection { questions, submitting, controller }
        AskSection { ai, controller }

        if let Some(result) = result {
            div { class: "modal-overlay",
                div { class: "modal-card",
                    h3 { "Quiz Result" }
                    p { class: "modal-score", "{result.score_line}" }
                    button {
                        id: "result-close",
                        onclick: move |_| {
                            let _ = controller.write().dismiss_result();
                        },
                        "Close"
                    }
                    button {
                        class: "primary",
                        onclick: move |_| {
                            let _ = controller.write().dismiss_result();
                        },
                        "Continue"
                    }
                }
            }
        }
    }
}

#[component]
fn QuizSection(
    questions: Vec<QuestionVm>,
    submitting: bool,
    controller: Signal<SessionController>,
) -> Element {
    let mut controller = controller;
    let mut notice = use_signal(|| None::<String>);

    rsx! {
        section { class: "section",
            h2 { "Quiz" }
            if questions.is_empty() {
                p { class: "muted", "No quiz for this lesson." }
            }
            for question in questions {
                div { key: "{question.index}", class: "quiz-card",
                    p { class: "quiz-question", "{question.prompt}" }
                    for option in question.options {
                        button {
                            key: "{option.text}",
                            class: option.feedback.class(),
                            onclick: {
                                let index = question.index;
                                let text = option.text.clone();
                                move |_| {
                                    let _ = controller.write().select_answer(index, text.clone());
                                }
                            },
                            "{option.text}"
                        }
                    }
                }
            }
            if let Some(message) = notice() {
                p { class: "notice", "{message}" }
            }
            button {
                id: "quiz-submit",
                class: "primary",
                disabled: submitting,
                onclick: move |_| {
                    let outcome = controller.write().submit();
                    match outcome {
                        Ok(SubmitOutcome { submission, write }) => {
                            notice.set(None);
                            // The score shows once the progress write has settled.
                            spawn(async move {
                                write.commit_logged().await;
                                controller.write().finish_submit(&submission);
                            });
                        }
                        Err(err) => notice.set(Some(err.to_string())),
                    }
                },
                if submitting { "Saving..." } else { "Submit Quiz" }
            }
        }
    }
}

#[component]
fn AskSection(ai: AiVm, controller: Signal<SessionController>) -> Element {
    let mut controller = controller;
    let mut question = use_signal(String::new);

    rsx! {
        section { class: "section",
            h2 { "Ask AI" }
            input {
                class: "ai-input",
                placeholder: "Ask a question about the lesson...",
                value: "{question}",
                oninput: move |evt| question.set(evt.value()),
            }
            div { class: "ai-actions",
                button {
                    id: "ai-ask",
                    class: "primary",
                    disabled: ai.pending,
                    onclick: move |_| {
                        let text = question.read().clone();
                        let Ok(request) = controller.write().begin_ask(&text) else {
                            return;
                        };
                        spawn(async move {
                            let response = request.send().await;
                            controller.write().finish_ask(response);
                        });
                    },
                    "Ask AI"
                }
                button {
                    id: "ai-clear",
                    onclick: move |_| {
                        question.set(String::new());
                        controller.write().clear_ai();
                    },
                    "Clear"
                }
            }
            if let Some(notice) = ai.notice {
                p { class: "notice", "{notice}" }
            }
            if let Some(text) = ai.text {
                div { class: "ai-answer", "{text}" }
            }
        }
    }
}
