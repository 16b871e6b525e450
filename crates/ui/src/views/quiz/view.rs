use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::use_navigator;

use quiz_core::export::{ExportDocument, PDF_MIME};
use quiz_core::model::AttemptRecord;
use quiz_core::share::share_link;
use services::{
    ExitDecision, ExitGuard, LoadOutcome, QuizSession, SessionError, SessionPhase,
    SubmissionStatus,
};

use super::components::{
    AttemptPanel, ExitDialog, FailedPanel, LoadingPanel, PreviewPanel, QuizScreen, ResultPanel,
};
use super::screen::{attempt_rows, quiz_screen};
use crate::context::{AppContext, sync_auth_state};
use crate::routes::Route;
use crate::views::ViewError;
use crate::views::scripts::{copy_to_clipboard, download_bytes};
use crate::vm::QuizIntent;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

pub(crate) const SHARE_COPIED: &str = "Link copied to clipboard!";

fn apply(
    session: &mut Signal<Option<QuizSession>>,
    step: impl FnOnce(&mut QuizSession) -> Result<(), SessionError>,
) -> Option<String> {
    let mut guard = session.write();
    let current = guard.as_mut()?;
    step(current).err().map(|err| err.to_string())
}

#[component]
pub fn QuizView(topic: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut session = use_signal(|| None::<QuizSession>);
    let mut exit = use_signal(ExitGuard::<Route>::new);
    let mut notice = use_signal(|| None::<String>);
    let mut share_notice = use_signal(|| None::<String>);
    let mut result_history = use_signal(|| None::<Vec<AttemptRecord>>);

    let mut resource = {
        let ctx = ctx.clone();
        use_resource(move || {
            let ctx = ctx.clone();
            let topic = topic.clone();
            async move {
                let service = ctx.quiz_sessions();
                // A failed session is reused so a retry keeps its identifier.
                let previous = session.write().take();
                let mut current = match previous {
                    Some(existing) if existing.phase() == SessionPhase::Failed => existing,
                    _ => QuizSession::new(&topic),
                };
                let mut record = None;
                if current.phase() != SessionPhase::NoData {
                    let outcome = service
                        .load(&mut current)
                        .await
                        .map_err(|err| ViewError::Message(err.to_string()))?;
                    if outcome == LoadOutcome::Activated {
                        record = current.record();
                    }
                }
                sync_auth_state(&ctx);
                session.set(Some(current));
                if let Some(record) = record {
                    spawn(async move { service.persist(&record).await });
                }
                Ok::<_, ViewError>(())
            }
        })
    };

    use_future(move || async move {
        loop {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let running = session.peek().as_ref().is_some_and(QuizSession::guards_exit);
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
                QuizIntent::Start => apply(&mut session, QuizSession::start),
                QuizIntent::Select { index, option } => {
                    apply(&mut session, |current| current.select_answer(index, &option))
                }
                QuizIntent::Next => apply(&mut session, QuizSession::advance),
                QuizIntent::Previous => apply(&mut session, QuizSession::retreat),
                QuizIntent::Jump(index) => apply(&mut session, |current| current.jump_to(index)),
                QuizIntent::Submit => {
                    let pending = session.write().as_mut().map(QuizSession::begin_submit);
                    match pending {
                        Some(Ok(pending)) => {
                            let ctx = ctx.clone();
                            spawn(async move {
                                let service = ctx.quiz_sessions();
                                let status = service.deliver(&pending).await;
                                let saved = status == SubmissionStatus::Saved;
                                if let Some(current) = session.write().as_mut() {
                                    current.finish_submit(&pending, status, service.policy());
                                }
                                sync_auth_state(&ctx);
                                if saved {
                                    if let Ok(records) = service.list_results().await {
                                        result_history.set(Some(records));
                                    }
                                }
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

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch, session);
            }
        }
    }

    let request_exit = use_callback(move |target: Route| {
        let guarded = session.peek().as_ref().is_some_and(QuizSession::guards_exit);
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

    let on_export = use_callback(move |()| {
        let document = {
            let guard = session.read();
            let Some(current) = guard.as_ref() else {
                return;
            };
            let Some(topic) = current.topic() else {
                return;
            };
            ExportDocument::build(topic, current.questions())
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
            let Some(id) = session.peek().as_ref().map(QuizSession::id) else {
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

    let screen = quiz_screen(session.read().as_ref());
    let title = session
        .read()
        .as_ref()
        .and_then(QuizSession::topic)
        .map(|topic| format!("{topic} Quiz"))
        .unwrap_or_default();
    let load_error = match &*resource.read() {
        Some(Err(err)) => Some(err.message().to_string()),
        _ => None,
    };

    rsx! {
        div { class: "page quiz-page",
            if let Some(message) = load_error {
                p { class: "form-error", "{message}" }
            }
            match screen {
                QuizScreen::Loading => rsx! {
                    LoadingPanel { label: "Generating your quiz..." }
                },
                QuizScreen::NoData => rsx! {
                    div { class: "quiz-error",
                        h2 { "No Quiz Data" }
                        p { "No quiz data found. Please go back and select a topic." }
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            onclick: move |_| request_exit.call(Route::Home {}),
                            "Back to Home"
                        }
                    }
                },
                QuizScreen::Failed(message) => rsx! {
                    FailedPanel {
                        message,
                        on_retry: move |()| resource.restart(),
                        on_home: move |()| request_exit.call(Route::Home {}),
                    }
                },
                QuizScreen::Preview(preview) => rsx! {
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
                        history: attempt_rows(result_history.read().as_ref()),
                        primary_label: "Take Another Quiz",
                        on_primary: move |()| request_exit.call(Route::Home {}),
                        on_home: move |()| request_exit.call(Route::Home {}),
                    }
                },
                QuizScreen::Closed => rsx! {
                    LoadingPanel { label: "Leaving quiz..." }
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

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    session: Rc<RefCell<Option<Signal<Option<QuizSession>>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<QuizIntent>,
        session: Signal<Option<QuizSession>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.session.borrow_mut() = Some(session);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn session(&self) -> Signal<Option<QuizSession>> {
        (*self.session.borrow()).expect("quiz session registered")
    }
}
