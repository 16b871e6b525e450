use dioxus::prelude::*;

use crate::vm::{AttemptRowVm, AttemptVm, PreviewVm, QuestionVm, QuizIntent, ResultVm};

/// What the quiz page shows, derived from the session on every render.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum QuizScreen {
    Loading,
    NoData,
    Failed(String),
    Preview(PreviewVm),
    Attempt(AttemptVm),
    Result(ResultVm),
    Closed,
}

#[component]
pub(crate) fn LoadingPanel(label: &'static str) -> Element {
    rsx! {
        div { class: "quiz-loading",
            div { class: "loader" }
            p { "{label}" }
        }
    }
}

#[component]
pub(crate) fn FailedPanel(message: String, on_retry: EventHandler<()>, on_home: EventHandler<()>) -> Element {
    rsx! {
        div { class: "quiz-error",
            h2 { "Error" }
            p { class: "quiz-error__message", "{message}" }
            div { class: "quiz-actions",
                button {
                    class: "btn btn-primary",
                    id: "quiz-retry",
                    r#type: "button",
                    onclick: move |_| on_retry.call(()),
                    "Retry"
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_home.call(()),
                    "Back to Home"
                }
            }
        }
    }
}

#[component]
pub(crate) fn AttemptsTable(title: &'static str, rows: Vec<AttemptRowVm>) -> Element {
    if rows.is_empty() {
        return rsx! {};
    }
    rsx! {
        div { class: "attempts",
            h3 { "{title}" }
            table { class: "attempts__table",
                thead {
                    tr {
                        th { "Topic" }
                        th { "Score" }
                        th { "Percentage" }
                        th { "Date" }
                    }
                }
                tbody {
                    for (idx, row) in rows.iter().enumerate() {
                        tr { key: "{idx}",
                            td { "{row.topic}" }
                            td { "{row.score_label}" }
                            td { "{row.percentage_label}" }
                            td { "{row.date_label}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub(crate) fn PreviewPanel(
    preview: PreviewVm,
    on_intent: EventHandler<QuizIntent>,
    on_export: EventHandler<()>,
    on_share: EventHandler<()>,
    share_notice: Option<String>,
) -> Element {
    rsx! {
        div { class: "quiz-preview",
            h2 { "Quiz Preview: {preview.topic}" }
            p { class: "quiz-description",
                "Review the questions below. Start the quiz when you are ready; the timer begins then."
            }
            div { class: "quiz-actions",
                button {
                    class: "btn btn-primary",
                    id: "quiz-start",
                    r#type: "button",
                    onclick: move |_| on_intent.call(QuizIntent::Start),
                    "Start Quiz"
                }
                button {
                    class: "btn btn-secondary",
                    id: "quiz-export",
                    r#type: "button",
                    onclick: move |_| on_export.call(()),
                    "Download PDF"
                }
                button {
                    class: "btn btn-secondary",
                    id: "quiz-share",
                    r#type: "button",
                    onclick: move |_| on_share.call(()),
                    "Share Quiz"
                }
            }
            if let Some(notice) = share_notice {
                p { class: "share-notice", "{notice}" }
            }
            div { class: "quiz-overview",
                h3 { "Quiz Overview" }
                ul {
                    li { "{preview.total_label}" }
                    li { "Topic: {preview.topic}" }
                    li { "Time Limit: No time limit" }
                }
            }
            AttemptsTable { title: "Your Previous Attempts", rows: preview.previous_attempts.clone() }
            for question in preview.questions.iter() {
                div { key: "{question.index}", class: "preview-question",
                    h3 { class: "question-number", "{question.number_label}" }
                    p { class: "question-text", "{question.text}" }
                    ul { class: "preview-options",
                        for (idx, option) in question.options.iter().enumerate() {
                            li { key: "{idx}", class: if option.is_correct { "preview-option preview-option--correct" } else { "preview-option" },
                                "{option.label}"
                                if option.is_correct {
                                    span { class: "correct-badge", "Correct Answer" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn QuestionCard(question: QuestionVm, on_intent: EventHandler<QuizIntent>) -> Element {
    let index = question.index;
    rsx! {
        div { class: "question-card",
            h3 { class: "question-number", "{question.number_label}" }
            p { class: "question-text", "{question.text}" }
            div { class: "options",
                for (idx, option) in question.options.iter().enumerate() {
                    button {
                        key: "{idx}",
                        class: if option.selected { "option-btn selected" } else { "option-btn" },
                        id: "quiz-option-{idx}",
                        r#type: "button",
                        onclick: {
                            let label = option.label.clone();
                            move |_| on_intent.call(QuizIntent::Select { index, option: label.clone() })
                        },
                        "{option.label}"
                    }
                }
            }
        }
    }
}

#[component]
pub(crate) fn AttemptPanel(
    title: String,
    attempt: AttemptVm,
    on_intent: EventHandler<QuizIntent>,
    on_quit: EventHandler<()>,
) -> Element {
    let submit_label = if attempt.submitting { "Submitting..." } else { "Submit Quiz" };
    rsx! {
        div { class: "session-overlay",
            div {
                class: "session-modal",
                role: "dialog",
                aria_modal: "true",
                header { class: "session-modal__header",
                    h2 { class: "session-modal__title", "{title}" }
                    span { class: "quiz-timer", id: "quiz-timer", "{attempt.timer_label}" }
                    button {
                        class: "session-modal__quit",
                        id: "quiz-quit",
                        r#type: "button",
                        onclick: move |_| on_quit.call(()),
                        "Quit"
                    }
                }
                div { class: "progress-dots",
                    for dot in attempt.dots.iter().copied() {
                        button {
                            key: "{dot.index}",
                            class: match (dot.current, dot.answered) {
                                (true, _) => "progress-dot progress-dot--current",
                                (false, true) => "progress-dot progress-dot--answered",
                                (false, false) => "progress-dot",
                            },
                            r#type: "button",
                            onclick: move |_| on_intent.call(QuizIntent::Jump(dot.index)),
                            "{dot.index + 1}"
                        }
                    }
                }
                div { class: "session-modal__body",
                    if let Some(question) = attempt.current.clone() {
                        QuestionCard { question, on_intent }
                    }
                }
                footer { class: "session-modal__footer",
                    span { class: "session-footer__item", "{attempt.progress_label}" }
                    span { class: "session-footer__item", "{attempt.answered_label}" }
                    button {
                        class: "btn btn-secondary",
                        id: "quiz-previous",
                        r#type: "button",
                        disabled: attempt.is_first,
                        onclick: move |_| on_intent.call(QuizIntent::Previous),
                        "Previous"
                    }
                    if attempt.is_last {
                        button {
                            class: "btn btn-primary",
                            id: "quiz-submit",
                            r#type: "button",
                            disabled: !attempt.can_submit,
                            onclick: move |_| on_intent.call(QuizIntent::Submit),
                            "{submit_label}"
                        }
                    } else {
                        button {
                            class: "btn btn-primary",
                            id: "quiz-next",
                            r#type: "button",
                            onclick: move |_| on_intent.call(QuizIntent::Next),
                            "Next"
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub(crate) fn ExitDialog(on_confirm: EventHandler<()>, on_cancel: EventHandler<()>) -> Element {
    rsx! {
        div { class: "exit-overlay",
            div { class: "exit-dialog", role: "alertdialog", aria_modal: "true",
                h3 { "⚠️ Leave Quiz?" }
                p { "Are you sure you want to leave? Your progress will be lost." }
                div { class: "quiz-actions",
                    button {
                        class: "btn btn-danger",
                        id: "exit-confirm",
                        r#type: "button",
                        onclick: move |_| on_confirm.call(()),
                        "Leave Quiz"
                    }
                    button {
                        class: "btn btn-secondary",
                        id: "exit-cancel",
                        r#type: "button",
                        onclick: move |_| on_cancel.call(()),
                        "Continue Quiz"
                    }
                }
            }
        }
    }
}

#[component]
pub(crate) fn ResultPanel(
    result: ResultVm,
    history: Vec<AttemptRowVm>,
    primary_label: &'static str,
    on_primary: EventHandler<()>,
    on_home: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "result-container",
            h2 { class: "result-title", "{result.badge} Quiz Result" }
            p { class: "result-topic", "Topic: " strong { "{result.topic}" } }
            div { class: "result-card",
                p { class: "result-score", "{result.score_label}" }
                p { class: "result-percentage", "{result.percentage_label}" }
                p { class: "result-feedback", "{result.feedback}" }
                p { class: "result-time", "{result.time_label}" }
                if result.saved {
                    p { class: "result-saved", "✓ Result saved to your profile" }
                }
                if let Some(note) = result.submission_note.clone() {
                    p { class: "result-note", "{note}" }
                }
            }
            div { class: "result-review",
                for (idx, item) in result.review.iter().enumerate() {
                    div { key: "{idx}", class: if item.is_correct { "review-item review-item--correct" } else { "review-item review-item--wrong" },
                        p { class: "review-item__question", "{item.number_label}: {item.question}" }
                        p { "Your answer: {item.selected}" }
                        if !item.is_correct {
                            p { "Correct answer: {item.correct_answer}" }
                        }
                    }
                }
            }
            AttemptsTable { title: "Your Previous Scores", rows: history }
            div { class: "quiz-actions",
                button {
                    class: "btn btn-primary",
                    id: "result-primary",
                    r#type: "button",
                    onclick: move |_| on_primary.call(()),
                    "{primary_label}"
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_home.call(()),
                    "Back to Home"
                }
            }
        }
    }
}
