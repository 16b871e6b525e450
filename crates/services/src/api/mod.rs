//! Backend contracts consumed by the session machines and account services.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use quiz_core::model::{
    AttemptRecord, AuthToken, Question, QuizId, RawQuestion, Topic, TopicHistory, UserProfile,
};

use crate::error::QuizApiError;

mod http;

pub use http::HttpBackend;

/// Body of `persistQuiz`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizRecord {
    pub uuid: QuizId,
    pub topic: Topic,
    pub questions: Vec<Question>,
}

/// A stored quiz fetched by identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedQuiz {
    pub id: QuizId,
    pub topic: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_index: usize,
    pub selected_answer: String,
    pub is_correct: bool,
}

/// Body of `submitResult`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSubmission {
    pub topic: String,
    pub score: u32,
    pub total_questions: u32,
    pub time_spent: u32,
    #[serde(rename = "quizUUID")]
    pub quiz_uuid: QuizId,
    pub answers: Vec<SubmittedAnswer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: UserProfile,
    #[serde(default)]
    pub quiz_history: Vec<AttemptRecord>,
}

/// Question generation, quiz persistence and result storage.
#[async_trait]
pub trait QuizApi: Send + Sync {
    /// Ask the backend to generate questions for `topic`.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError::Generation` on network failure or a malformed response.
    async fn generate_questions(&self, topic: &Topic) -> Result<Vec<RawQuestion>, QuizApiError>;

    /// Store a freshly generated quiz under its client-generated id.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError::Persistence` if the backend does not accept it.
    async fn persist_quiz(&self, record: &QuizRecord) -> Result<(), QuizApiError>;

    /// Fetch a stored quiz by id.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError::NotFound` for unknown ids or payloads without questions.
    async fn fetch_quiz(&self, id: QuizId) -> Result<SharedQuiz, QuizApiError>;

    /// Record a finished attempt for the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError::Unauthorized` for a rejected credential and
    /// `QuizApiError::Persistence` for other failures.
    async fn submit_result(
        &self,
        token: &AuthToken,
        submission: &ResultSubmission,
    ) -> Result<(), QuizApiError>;

    /// All stored attempts of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError` for transport or authorization failures.
    async fn list_results(&self, token: &AuthToken) -> Result<Vec<AttemptRecord>, QuizApiError>;

    /// Previous attempts of the signed-in user for one topic.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError` for transport or authorization failures.
    async fn topic_history(
        &self,
        token: &AuthToken,
        topic: &Topic,
    ) -> Result<TopicHistory, QuizApiError>;
}

/// Sign-in, registration and profile.
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `QuizApiError` when the backend rejects the credentials.
    async fn login(&self, request: &LoginRequest) -> Result<AuthToken, QuizApiError>;

    /// # Errors
    ///
    /// Returns `QuizApiError` when the backend rejects the registration.
    async fn register(&self, request: &RegisterRequest) -> Result<(), QuizApiError>;

    /// # Errors
    ///
    /// Returns `QuizApiError::Unauthorized` for a rejected credential.
    async fn profile(&self, token: &AuthToken) -> Result<ProfileResponse, QuizApiError>;
}
