use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::use_navigator;

use quiz_core::export::{ExportDocument, PDF_MIME};
use quiz_core::model::Topic;
use quiz_core::share::share_link;
use services::{ExitDecision, ExitGuard, SessionError, SessionPhase, SharedQuizSession};

use crate::context::{AppContext, sync_auth_state};
use crate::routes::Route;
use crate::views::ViewError;
use crate::views::quiz::{
    AttemptPanel, ExitDialog, FailedPanel, LoadingPanel, PreviewPanel, QuizScreen, ResultPanel,
    SHARE_COPIED, shared_screen,
};
use crate::views::scripts::{copy_to_clipboard, download_bytes};
use crate::vm::QuizIntent;

fn apply(
    session: &mut Signal<Option<SharedQuizSession>>,
    step: impl FnOnce(&mut SharedQuizSession) -> Result<(), SessionError>,
) -> Option<String> {
    let mut guard = session.write();
    let current = guard.as_mut()?;
    step(current).err().map(|err| err.to_string())
}

/// Takes a quiz someone else generated, addressed by the identifier in the link.
#[component]
pub fn SharedQuizView(uuid: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut session = use_signal(|| None::<SharedQuizSession>);
    let mut exit = use_signal(ExitGuard::<Route>::new);
    let mut notice = use_signal(|| None::<String>);
    let mut share_notice = use_signal(|| None::<String>);

    let mut resource = {
        let ctx = ctx.clone();
        use_resource(move || {
            let ctx = ctx.clone();
            let uuid = uuid.clone();
            async move {
                let service = ctx.shared_quizzes();
                let previous = session.write().take();
                let mut current = match previous {
                    Some(existing)
                        if existing.phase() == SessionPhase::Failed && existing.id().is_some() =>
                    {
                        existing
                    }
                    _ => SharedQuizSession::from_target(&uuid),
                };
                if current.id().is_some() {
                    service
                        .load(&mut current)
                        .await
                        .map_err(|err| ViewError::Message(err.to_string()))?;
                }
                session.set(Some(current));
                Ok::<_, ViewError>(())
            }
        })
    };

    use_future(move || async move {
        loop {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let running = session
                .peek()
                .as_ref()
                .is_some_and(SharedQuizSession::guards_exit);
            if running {
                if let Some(current) = session.write().as_mut() {
                    current.tick();
                }
            }
        }
    });

    let dispatch = {
        let ctx = ctx.clone();
        use_callback(move |intent: QuizIntent| {
            let failure = match intent {
                QuizIntent::Start => apply(&mut session, SharedQuizSession::start),
                QuizIntent::Select { index, option } => {
                    apply(&mut session, |current| current.select_answer(index, &option))
                }
                QuizIntent::Next => apply(&mut session, SharedQuizSession::advance),
                QuizIntent::Previous => apply(&mut session, SharedQuizSession::retreat),
                QuizIntent::Jump(index) => apply(&mut session, |current| current.jump_to(index)),
                QuizIntent::Submit => {
                    let pending = session.write().as_mut().map(SharedQuizSession::begin_submit);
                    match pending {
                        Some(Ok(pending)) => {
                            let ctx = ctx.clone();
                            spawn(async move {
                                let service = ctx.shared_quizzes();
                                let status = service.deliver(&pending).await;
                                if let Some(current) = session.write().as_mut() {
                                    current.finish_submit(&pending, status, service.policy());
                                }
                                sync_auth_state(&ctx);
                            });
                            None
                        }
                        Some(Err(err)) => Some(err.to_string()),
                        None => None,
                    }
                }
            };
            notice.set(failure);
        })
    };

    let request_exit = use_callback(move |target: Route| {
        let guarded = session
            .peek()
            .as_ref()
            .is_some_and(SharedQuizSession::guards_exit);
        let decision = exit.write().request(guarded, target);
        if let ExitDecision::Proceed(target) = decision {
            let _ = navigator.push(target);
        }
    });

    let confirm_exit = use_callback(move |()| {
        let target = exit.write().confirm();
        if let Some(target) = target {
            if let Some(current) = session.write().as_mut() {
                current.discard();
            }
            let _ = navigator.push(target);
        }
    });

    let on_restart = use_callback(move |()| {
        notice.set(apply(&mut session, SharedQuizSession::restart));
    });

    let on_export = use_callback(move |()| {
        let document = {
            let guard = session.read();
            let Some(current) = guard.as_ref() else {
                return;
            };
            let Ok(topic) = Topic::new(current.topic()) else {
                return;
            };
            ExportDocument::build(&topic, current.questions())
        };
        match document.render_pdf() {
            Ok(bytes) => {
                spawn(async move {
                    download_bytes(&document.file_name("pdf"), PDF_MIME, &bytes).await;
                });
            }
            Err(err) => notice.set(Some(err.to_string())),
        }
    });

    let on_share = {
        let origin = ctx.share_origin().to_string();
        use_callback(move |()| {
            let Some(id) = session.peek().as_ref().and_then(SharedQuizSession::id) else {
                return;
            };
            match share_link(&origin, id) {
                Ok(link) => {
                    spawn(async move {
                        let copied = copy_to_clipboard(&link).await;
                        share_notice.set(Some(if copied {
                            SHARE_COPIED.to_string()
                        } else {
                            format!("Copy this link to share the quiz: {link}")
                        }));
                    });
                }
                Err(err) => share_notice.set(Some(err.to_string())),
            }
        })
    };

    let screen = shared_screen(session.read().as_ref());
    let title = session
        .read()
        .as_ref()
        .map(|current| format!("{} Quiz", current.topic()))
        .unwrap_or_default();
    let can_retry = session
        .read()
        .as_ref()
        .is_some_and(|current| current.id().is_some());
    let load_error = match &*resource.read() {
        Some(Err(err)) => Some(err.message().to_string()),
        _ => None,
    };

    rsx! {
        div { class: "page quiz-page shared-quiz-page",
            if let Some(message) = load_error {
                p { class: "form-error", "{message}" }
            }
            match screen {
                QuizScreen::Loading => rsx! {
                    LoadingPanel { label: "Loading shared quiz..." }
                },
                QuizScreen::NoData | QuizScreen::Closed => rsx! {
                    LoadingPanel { label: "Leaving quiz..." }
                },
                QuizScreen::Failed(message) if can_retry => rsx! {
                    FailedPanel {
                        message,
                        on_retry: move |()| resource.restart(),
                        on_home: move |()| request_exit.call(Route::Home {}),
                    }
                },
                QuizScreen::Failed(message) => rsx! {
                    div { class: "quiz-error",
                        h2 { "Error" }
                        p { class: "quiz-error__message", "{message}" }
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            onclick: move |_| request_exit.call(Route::Home {}),
                            "Back to Home"
                        }
                    }
                },
                QuizScreen::Preview(preview) => rsx! {
                    div { class: "shared-banner", "📤 Shared Quiz" }
                    PreviewPanel {
                        preview,
                        on_intent: move |intent| dispatch.call(intent),
                        on_export: move |()| on_export.call(()),
                        on_share: move |()| on_share.call(()),
                        share_notice: share_notice(),
                    }
                },
                QuizScreen::Attempt(attempt) => rsx! {
                    AttemptPanel {
                        title,
                        attempt,
                        on_intent: move |intent| dispatch.call(intent),
                        on_quit: move |()| request_exit.call(Route::Home {}),
                    }
                },
                QuizScreen::Result(result) => rsx! {
                    ResultPanel {
                        result,
                        history: Vec::new(),
                        primary_label: "Try Again",
                        on_primary: move |()| on_restart.call(()),
                        on_home: move |()| request_exit.call(Route::Home {}),
                    }
                },
            }
            if let Some(message) = notice() {
                p { class: "form-error", "{message}" }
            }
            if exit.read().is_pending() {
                ExitDialog {
                    on_confirm: move |()| confirm_exit.call(()),
                    on_cancel: move |()| exit.write().cancel(),
                }
            }
        }
    }
}
