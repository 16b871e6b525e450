use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::{AppContext, sync_auth_state};
use crate::routes::Route;

#[component]
pub fn SignInView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    {
        let ctx = ctx.clone();
        use_effect(move || {
            if ctx.is_authenticated() {
                let _ = navigator.replace(Route::Home {});
            }
        });
    }

    let on_submit = {
        let ctx = ctx.clone();
        use_callback(move |()| {
            if busy() {
                return;
            }
            busy.set(true);
            error.set(None);
            let ctx = ctx.clone();
            let (email_value, password_value) = (email(), password());
            spawn(async move {
                match ctx.accounts().sign_in(&email_value, &password_value).await {
                    Ok(()) => {
                        sync_auth_state(&ctx);
                        let _ = navigator.replace(Route::Home {});
                    }
                    Err(err) => error.set(Some(err.user_message())),
                }
                busy.set(false);
            });
        })
    };

    rsx! {
        div { class: "page auth-page",
            form {
                class: "auth-form",
                onsubmit: move |evt| {
                    evt.prevent_default();
                    on_submit.call(());
                },
                h2 { "Sign In" }
                label { r#for: "signin-email", "Email" }
                input {
                    id: "signin-email",
                    r#type: "email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                label { r#for: "signin-password", "Password" }
                input {
                    id: "signin-password",
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                if let Some(message) = error() {
                    p { class: "form-error", "{message}" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Signing in..." } else { "Sign In" }
                }
                p { class: "auth-switch",
                    "Don't have an account? "
                    Link { to: Route::SignUp {}, "Sign up" }
                }
            }
        }
    }
}
