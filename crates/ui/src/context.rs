use std::sync::Arc;

use dioxus::prelude::*;
use services::{
    AccountService, AuthContext, ProfileService, QuizSessionService, SharedQuizService,
};

pub trait UiApp: Send + Sync {
    /// Origin used to build share links, e.g. `http://localhost:8080`.
    fn share_origin(&self) -> String;

    fn auth(&self) -> AuthContext;
    fn quiz_sessions(&self) -> Arc<QuizSessionService>;
    fn shared_quizzes(&self) -> Arc<SharedQuizService>;
    fn accounts(&self) -> Arc<AccountService>;
    fn profiles(&self) -> Arc<ProfileService>;
}

#[derive(Clone)]
pub struct AppContext {
    share_origin: String,
    auth: AuthContext,
    quiz_sessions: Arc<QuizSessionService>,
    shared_quizzes: Arc<SharedQuizService>,
    accounts: Arc<AccountService>,
    profiles: Arc<ProfileService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            share_origin: app.share_origin(),
            auth: app.auth(),
            quiz_sessions: app.quiz_sessions(),
            shared_quizzes: app.shared_quizzes(),
            accounts: app.accounts(),
            profiles: app.profiles(),
        }
    }

    #[must_use]
    pub fn share_origin(&self) -> &str {
        &self.share_origin
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    #[must_use]
    pub fn quiz_sessions(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.quiz_sessions)
    }

    #[must_use]
    pub fn shared_quizzes(&self) -> Arc<SharedQuizService> {
        Arc::clone(&self.shared_quizzes)
    }

    #[must_use]
    pub fn accounts(&self) -> Arc<AccountService> {
        Arc::clone(&self.accounts)
    }

    #[must_use]
    pub fn profiles(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profiles)
    }
}

/// Reactive mirror of the sign-in state, provided by the layout so the header
/// follows sign-in, sign-out and credential invalidation.
#[derive(Clone, Copy)]
pub struct AuthState {
    pub signed_in: Signal<bool>,
}

/// Re-reads the credential into [`AuthState`] when one is provided.
pub fn sync_auth_state(ctx: &AppContext) {
    if let Some(state) = try_consume_context::<AuthState>() {
        let mut signed_in = state.signed_in;
        signed_in.set(ctx.is_authenticated());
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
