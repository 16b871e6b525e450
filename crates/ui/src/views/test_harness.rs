use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::model::{
    AttemptRecord, AuthToken, QuizId, RawQuestion, Topic, TopicHistory, UserProfile,
};
use quiz_core::time::fixed_now;
use services::api::{
    LoginRequest, ProfileResponse, QuizRecord, RegisterRequest, ResultSubmission, SharedQuiz,
};
use services::{
    AccountApi, AccountService, AuthContext, Clock, ProfileService, QuizApi, QuizApiError,
    QuizSessionService, SharedQuizService,
};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::quiz::QuizTestHandles;
use crate::views::{HomeView, ProfileView, QuizView, SharedQuizView, SignInView, SignUpView};

pub const TEST_ORIGIN: &str = "http://localhost:8080";

fn raw(question: &str, answer: &str, options: &[&str]) -> RawQuestion {
    RawQuestion {
        question: Some(question.to_string()),
        correct_answer: Some(answer.to_string()),
        options: Some(options.iter().map(ToString::to_string).collect()),
    }
}

pub fn attempt(topic: &str, score: u32, total: u32) -> AttemptRecord {
    AttemptRecord {
        topic: topic.to_string(),
        score,
        total_questions: total,
        time_spent: Some(42),
        created_at: Some(fixed_now()),
    }
}

/// Backend double covering both the quiz and the account endpoints.
#[derive(Default)]
pub struct FakeBackend {
    pub fail_generation: bool,
    pub reject_token: bool,
    pub stall_save: bool,
    pub saved: Mutex<Vec<QuizRecord>>,
    pub submitted: Mutex<Vec<ResultSubmission>>,
    pub history: Vec<AttemptRecord>,
}

#[async_trait]
impl QuizApi for FakeBackend {
    async fn generate_questions(&self, _topic: &Topic) -> Result<Vec<RawQuestion>, QuizApiError> {
        if self.fail_generation {
            return Err(QuizApiError::Generation(String::new()));
        }
        Ok(vec![
            raw("What is 2 + 2?", "4", &["3", "4", "5", "6"]),
            raw("Capital of France?", "Paris", &["Paris", "Rome", "Berlin", "Madrid"]),
        ])
    }

    async fn persist_quiz(&self, record: &QuizRecord) -> Result<(), QuizApiError> {
        if self.stall_save {
            return std::future::pending().await;
        }
        self.saved.lock().expect("saved lock").push(record.clone());
        Ok(())
    }

    async fn fetch_quiz(&self, id: QuizId) -> Result<SharedQuiz, QuizApiError> {
        let saved = self.saved.lock().expect("saved lock");
        let record = saved
            .iter()
            .find(|record| record.uuid == id)
            .ok_or(QuizApiError::NotFound)?;
        Ok(SharedQuiz {
            id,
            topic: record.topic.to_string(),
            questions: record.questions.clone(),
        })
    }

    async fn submit_result(
        &self,
        _token: &AuthToken,
        submission: &ResultSubmission,
    ) -> Result<(), QuizApiError> {
        if self.reject_token {
            return Err(QuizApiError::Unauthorized);
        }
        self.submitted
            .lock()
            .expect("submitted lock")
            .push(submission.clone());
        Ok(())
    }

    async fn list_results(&self, _token: &AuthToken) -> Result<Vec<AttemptRecord>, QuizApiError> {
        Ok(self.history.clone())
    }

    async fn topic_history(
        &self,
        _token: &AuthToken,
        _topic: &Topic,
    ) -> Result<TopicHistory, QuizApiError> {
        Ok(TopicHistory {
            has_previous_attempts: !self.history.is_empty(),
            previous_quizzes: self.history.clone(),
        })
    }
}

#[async_trait]
impl AccountApi for FakeBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthToken, QuizApiError> {
        if request.password == "Correct#1" {
            AuthToken::new("issued-token").ok_or(QuizApiError::Unauthorized)
        } else {
            Err(QuizApiError::Unauthorized)
        }
    }

    async fn register(&self, _request: &RegisterRequest) -> Result<(), QuizApiError> {
        Ok(())
    }

    async fn profile(&self, _token: &AuthToken) -> Result<ProfileResponse, QuizApiError> {
        if self.reject_token {
            return Err(QuizApiError::Unauthorized);
        }
        Ok(ProfileResponse {
            user: UserProfile {
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
            },
            quiz_history: self.history.clone(),
        })
    }
}

#[derive(Clone)]
struct TestApp {
    auth: AuthContext,
    quiz_sessions: Arc<QuizSessionService>,
    shared_quizzes: Arc<SharedQuizService>,
    accounts: Arc<AccountService>,
    profiles: Arc<ProfileService>,
}

impl UiApp for TestApp {
    fn share_origin(&self) -> String {
        TEST_ORIGIN.to_string()
    }

    fn auth(&self) -> AuthContext {
        self.auth.clone()
    }

    fn quiz_sessions(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.quiz_sessions)
    }

    fn shared_quizzes(&self) -> Arc<SharedQuizService> {
        Arc::clone(&self.shared_quizzes)
    }

    fn accounts(&self) -> Arc<AccountService> {
        Arc::clone(&self.accounts)
    }

    fn profiles(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profiles)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Quiz(String),
    Shared(String),
    Profile,
    SignIn,
    SignUp,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    quiz_handles: Option<QuizTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    if let Some(handles) = props.quiz_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Quiz(topic) => rsx! { QuizView { topic } },
        ViewKind::Shared(uuid) => rsx! { SharedQuizView { uuid } },
        ViewKind::Profile => rsx! { ProfileView {} },
        ViewKind::SignIn => rsx! { SignInView {} },
        ViewKind::SignUp => rsx! { SignUpView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub backend: Arc<FakeBackend>,
    pub auth: AuthContext,
    pub quiz_handles: Option<QuizTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drives the dom until the rendered html contains `needle`.
    pub async fn drive_until(&mut self, needle: &str) -> String {
        for _ in 0..20 {
            let html = self.render();
            if html.contains(needle) {
                return html;
            }
            self.drive_async().await;
        }
        self.render()
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub async fn setup_view_harness(view: ViewKind, backend: FakeBackend, signed_in: bool) -> ViewHarness {
    let storage = Storage::in_memory();
    let auth = AuthContext::new(Arc::clone(&storage.credentials), Clock::fixed(fixed_now()));
    if signed_in {
        auth.establish(AuthToken::new("token").expect("token"))
            .await
            .expect("establish credential");
    }
    let backend = Arc::new(backend);
    let quiz_api: Arc<dyn QuizApi> = backend.clone();
    let account_api: Arc<dyn AccountApi> = backend.clone();

    let app = Arc::new(TestApp {
        auth: auth.clone(),
        quiz_sessions: Arc::new(QuizSessionService::new(Arc::clone(&quiz_api), auth.clone())),
        shared_quizzes: Arc::new(SharedQuizService::new(quiz_api, auth.clone())),
        accounts: Arc::new(AccountService::new(Arc::clone(&account_api), auth.clone())),
        profiles: Arc::new(ProfileService::new(account_api, auth.clone())),
    });

    let quiz_handles = match view {
        ViewKind::Quiz(_) => Some(QuizTestHandles::default()),
        _ => None,
    };

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            quiz_handles: quiz_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        backend,
        auth,
        quiz_handles,
    }
}
