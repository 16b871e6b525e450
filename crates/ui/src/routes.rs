use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::context::{AppContext, AuthState};
use crate::views::{HomeView, ProfileView, QuizView, SharedQuizView, SignInView, SignUpView};

#[derive(Clone, Routable, PartialEq, Debug)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/quiz?:topic", QuizView)] Quiz { topic: String },
        #[route("/quiz/shared/:uuid", SharedQuizView)] SharedQuiz { uuid: String },
        #[route("/profile", ProfileView)] Profile {},
        #[route("/signin", SignInView)] SignIn {},
        #[route("/signup", SignUpView)] SignUp {},
}

#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    let signed_in = use_signal(|| ctx.is_authenticated());
    use_context_provider(|| AuthState { signed_in });

    rsx! {
        div { class: "app",
            Header {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Header() -> Element {
    let auth = use_context::<AuthState>();
    let signed_in = (auth.signed_in)();

    rsx! {
        header { class: "topbar",
            Link { class: "logo", to: Route::Home {}, "🧠 IntelliQuiz" }
            nav { class: "topbar__actions",
                if signed_in {
                    Link { class: "btn btn-secondary", to: Route::Profile {}, "Profile" }
                } else {
                    Link { class: "btn btn-primary", to: Route::SignIn {}, "Sign In" }
                }
            }
        }
    }
}
