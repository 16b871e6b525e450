use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use quiz_core::password::PasswordStrength;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
fn Rule(met: bool, label: &'static str) -> Element {
    rsx! {
        li { class: if met { "password-rule password-rule--met" } else { "password-rule" },
            if met { "✓ " } else { "✗ " }
            "{label}"
        }
    }
}

#[component]
pub fn SignUpView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut name = use_signal(String::new);
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

    let strength = PasswordStrength::evaluate(&password.read());

    let on_submit = {
        let ctx = ctx.clone();
        use_callback(move |()| {
            if busy() {
                return;
            }
            busy.set(true);
            error.set(None);
            let ctx = ctx.clone();
            let (name_value, email_value, password_value) = (name(), email(), password());
            spawn(async move {
                match ctx
                    .accounts()
                    .sign_up(&name_value, &email_value, &password_value)
                    .await
                {
                    Ok(()) => {
                        let _ = navigator.push(Route::SignIn {});
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
                h2 { "Create Account" }
                label { r#for: "signup-name", "Name" }
                input {
                    id: "signup-name",
                    r#type: "text",
                    value: "{name}",
                    oninput: move |evt| name.set(evt.value()),
                }
                label { r#for: "signup-email", "Email" }
                input {
                    id: "signup-email",
                    r#type: "email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                label { r#for: "signup-password", "Password" }
                input {
                    id: "signup-password",
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                ul { class: "password-rules",
                    Rule { met: strength.length, label: "At least 8 characters" }
                    Rule { met: strength.uppercase, label: "One uppercase letter" }
                    Rule { met: strength.lowercase, label: "One lowercase letter" }
                    Rule { met: strength.number, label: "One number" }
                    Rule { met: strength.special, label: "One special character" }
                }
                if let Some(message) = error() {
                    p { class: "form-error", "{message}" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Creating account..." } else { "Sign Up" }
                }
                p { class: "auth-switch",
                    "Already have an account? "
                    Link { to: Route::SignIn {}, "Sign in" }
                }
            }
        }
    }
}
