use dioxus::prelude::*;
use dioxus_router::use_navigator;

use quiz_core::model::{PRESET_TOPICS, Topic};

use crate::routes::Route;

#[component]
pub fn HomeView() -> Element {
    let navigator = use_navigator();
    let mut custom_topic = use_signal(String::new);
    let mut selected = use_signal(|| None::<&'static str>);
    let mut error = use_signal(|| None::<String>);

    let on_start = use_callback(move |()| {
        let raw = match selected() {
            Some(preset) if custom_topic.read().trim().is_empty() => preset.to_string(),
            _ => custom_topic.read().clone(),
        };
        match Topic::new(raw) {
            Ok(topic) => {
                error.set(None);
                let _ = navigator.push(Route::Quiz {
                    topic: topic.to_string(),
                });
            }
            Err(err) => error.set(Some(err.to_string())),
        }
    });

    rsx! {
        div { class: "page home-page",
            h1 { class: "home-heading", "🎯 Select a Quiz Topic" }
            p { class: "home-tagline", "Choose a topic or enter your own to get started." }
            div { class: "home-input",
                input {
                    id: "custom-topic",
                    r#type: "text",
                    placeholder: "Enter a custom topic...",
                    value: "{custom_topic}",
                    oninput: move |evt| {
                        custom_topic.set(evt.value());
                        selected.set(None);
                    },
                }
                button {
                    class: "btn btn-primary",
                    id: "generate-quiz",
                    r#type: "button",
                    onclick: move |_| on_start.call(()),
                    "Generate Quiz"
                }
            }
            if let Some(message) = error() {
                p { class: "form-error", "{message}" }
            }
            div { class: "home-suggestions",
                h4 { "💡 Suggested Topics:" }
                div { class: "topic-grid",
                    for preset in PRESET_TOPICS {
                        button {
                            key: "{preset}",
                            class: if selected() == Some(preset) { "topic-chip topic-chip--selected" } else { "topic-chip" },
                            r#type: "button",
                            onclick: move |_| {
                                selected.set(Some(preset));
                                custom_topic.set(String::new());
                            },
                            "{preset}"
                        }
                    }
                }
            }
        }
    }
}
