use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::{AppContext, sync_auth_state};
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ProfileVm, map_profile};

#[component]
pub fn ProfileView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let mut resource = {
        let ctx = ctx.clone();
        use_resource(move || {
            let ctx = ctx.clone();
            async move {
                match ctx.profiles().load().await {
                    Ok(overview) => Ok(map_profile(&overview)),
                    Err(err) if err.requires_sign_in() => {
                        sync_auth_state(&ctx);
                        let _ = navigator.replace(Route::SignIn {});
                        Err(ViewError::SignInRequired)
                    }
                    Err(err) => Err(ViewError::Message(err.user_message())),
                }
            }
        })
    };
    let state = view_state_from_resource(resource);

    let on_logout = {
        let ctx = ctx.clone();
        use_callback(move |()| {
            let ctx = ctx.clone();
            spawn(async move {
                ctx.accounts().sign_out().await;
                sync_auth_state(&ctx);
                let _ = navigator.push(Route::Home {});
            });
        })
    };

    rsx! {
        div { class: "page profile-page",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "profile-loading", "Loading profile..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                    if err != ViewError::SignInRequired {
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| resource.restart(),
                            "Retry"
                        }
                    }
                },
                ViewState::Ready(profile) => rsx! {
                    ProfileCard { profile, on_logout }
                },
            }
        }
    }
}

#[component]
fn ProfileCard(profile: ProfileVm, on_logout: Callback<()>) -> Element {
    rsx! {
        div { class: "profile-header",
            div { class: "profile-avatar", "{profile.initial}" }
            div { class: "profile-identity",
                h2 { "{profile.name}" }
                p { class: "profile-email", "{profile.email}" }
            }
            button {
                class: "btn btn-danger",
                id: "logout",
                r#type: "button",
                onclick: move |_| on_logout.call(()),
                "Logout"
            }
        }
        div { class: "profile-stats",
            div { class: "stat-card",
                span { class: "stat-card__value", "{profile.total_quizzes}" }
                span { class: "stat-card__label", "Total Quizzes" }
            }
            div { class: "stat-card",
                span { class: "stat-card__value", "{profile.average_score}" }
                span { class: "stat-card__label", "Average Score" }
            }
            div { class: "stat-card",
                span { class: "stat-card__value", "{profile.highest_score}" }
                span { class: "stat-card__label", "Highest Score" }
            }
            div { class: "stat-card",
                span { class: "stat-card__value", "{profile.correct_label}" }
                span { class: "stat-card__label", "Correct Answers" }
            }
        }
        div { class: "profile-history",
            h3 { "Quiz History" }
            if profile.history.is_empty() {
                p { class: "profile-history__empty", "No quizzes taken yet. Start one from the home page!" }
            } else {
                table { class: "attempts__table",
                    thead {
                        tr {
                            th { "Topic" }
                            th { "Score" }
                            th { "Percentage" }
                            th { "Date" }
                            th { "Time" }
                        }
                    }
                    tbody {
                        for (idx, row) in profile.history.iter().enumerate() {
                            tr { key: "{idx}",
                                td { "{row.topic}" }
                                td { "{row.score_label}" }
                                td { "{row.percentage_label}" }
                                td { "{row.date_label}" }
                                td {
                                    if let Some(time) = &row.time_label {
                                        "{time}"
                                    } else {
                                        "-"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
