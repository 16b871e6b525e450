use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use quiz_core::model::{
    AttemptRecord, AuthToken, Question, QuestionPayload, QuizId, RawQuestion, Topic, TopicHistory,
};

use super::{
    AccountApi, LoginRequest, ProfileResponse, QuizApi, QuizRecord, RegisterRequest,
    ResultSubmission, SharedQuiz,
};
use crate::config::BackendConfig;
use crate::error::{GENERATION_FALLBACK, QuizApiError};

/// Upper bound for any single backend call, generation included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// `reqwest` client for the quiz backend.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpBackend {
    /// Builds the client with [`REQUEST_TIMEOUT`] applied to every request.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError::Http` if the TLS backend cannot be initialised.
    pub fn new(config: BackendConfig) -> Result<Self, QuizApiError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    topic: &'a str,
}

#[derive(Debug, Deserialize)]
struct StoredQuizBody {
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    questions: Option<Vec<RawQuestion>>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResultsBody {
    List(Vec<AttemptRecord>),
    Wrapped { results: Vec<AttemptRecord> },
}

/// Passes successful responses through; maps the rest to `QuizApiError`.
async fn check_status(response: Response) -> Result<Response, QuizApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(QuizApiError::Unauthorized);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(QuizApiError::NotFound);
    }
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty());
    Err(QuizApiError::Backend { status, message })
}

fn into_generation(err: QuizApiError) -> QuizApiError {
    match err {
        QuizApiError::Generation(_) => err,
        QuizApiError::Backend {
            message: Some(message),
            ..
        } => QuizApiError::Generation(message),
        QuizApiError::Http(inner) => QuizApiError::Generation(inner.to_string()),
        _ => QuizApiError::Generation(GENERATION_FALLBACK.to_string()),
    }
}

fn into_persistence(err: QuizApiError) -> QuizApiError {
    match err {
        QuizApiError::Unauthorized | QuizApiError::Persistence(_) => err,
        other => QuizApiError::Persistence(other.user_message()),
    }
}

pub(crate) fn parse_stored_quiz(id: QuizId, body: &str) -> Result<SharedQuiz, QuizApiError> {
    let parsed: StoredQuizBody =
        serde_json::from_str(body).map_err(|_| QuizApiError::NotFound)?;
    let questions = parsed.questions.ok_or(QuizApiError::NotFound)?;
    Ok(SharedQuiz {
        id,
        topic: parsed.topic.unwrap_or_default(),
        questions: questions.into_iter().map(Question::from_raw).collect(),
    })
}

pub(crate) fn parse_generated(body: &str) -> Result<Vec<RawQuestion>, QuizApiError> {
    serde_json::from_str::<QuestionPayload>(body)
        .map(QuestionPayload::into_questions)
        .map_err(|_| QuizApiError::Generation(GENERATION_FALLBACK.to_string()))
}

#[async_trait]
impl QuizApi for HttpBackend {
    async fn generate_questions(&self, topic: &Topic) -> Result<Vec<RawQuestion>, QuizApiError> {
        let url = self.config.endpoint(&["api", "quiz", "generate"]);
        let body = async {
            let response = self
                .client
                .post(url)
                .json(&GenerateRequest {
                    topic: topic.as_str(),
                })
                .send()
                .await?;
            let response = check_status(response).await?;
            Ok::<_, QuizApiError>(response.text().await?)
        }
        .await
        .map_err(into_generation)?;
        parse_generated(&body)
    }

    async fn persist_quiz(&self, record: &QuizRecord) -> Result<(), QuizApiError> {
        let url = self.config.endpoint(&["api", "quiz", "save"]);
        async {
            let response = self.client.post(url).json(record).send().await?;
            check_status(response).await?;
            Ok(())
        }
        .await
        .map_err(into_persistence)
    }

    async fn fetch_quiz(&self, id: QuizId) -> Result<SharedQuiz, QuizApiError> {
        let id_segment = id.to_string();
        let url = self.config.endpoint(&["api", "quiz", &id_segment]);
        let response = self.client.get(url).send().await?;
        let body = check_status(response).await?.text().await?;
        parse_stored_quiz(id, &body)
    }

    async fn submit_result(
        &self,
        token: &AuthToken,
        submission: &ResultSubmission,
    ) -> Result<(), QuizApiError> {
        let url = self.config.endpoint(&["api", "quiz", "results"]);
        async {
            let response = self
                .client
                .post(url)
                .bearer_auth(token.expose())
                .json(submission)
                .send()
                .await?;
            check_status(response).await?;
            Ok(())
        }
        .await
        .map_err(into_persistence)
    }

    async fn list_results(&self, token: &AuthToken) -> Result<Vec<AttemptRecord>, QuizApiError> {
        let url = self.config.endpoint(&["api", "quiz", "results"]);
        let response = self
            .client
            .get(url)
            .bearer_auth(token.expose())
            .send()
            .await?;
        let body: ResultsBody = check_status(response).await?.json().await?;
        Ok(match body {
            ResultsBody::List(results) | ResultsBody::Wrapped { results } => results,
        })
    }

    async fn topic_history(
        &self,
        token: &AuthToken,
        topic: &Topic,
    ) -> Result<TopicHistory, QuizApiError> {
        let url = self
            .config
            .endpoint(&["api", "user", "quiz-history", topic.as_str()]);
        let response = self
            .client
            .get(url)
            .bearer_auth(token.expose())
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }
}

#[async_trait]
impl AccountApi for HttpBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthToken, QuizApiError> {
        let url = self.config.endpoint(&["api", "auth", "login"]);
        let response = self.client.post(url).json(request).send().await?;
        let body: LoginResponse = check_status(response).await?.json().await?;
        AuthToken::new(body.token).ok_or(QuizApiError::Unauthorized)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), QuizApiError> {
        let url = self.config.endpoint(&["api", "auth", "register"]);
        let response = self.client.post(url).json(request).send().await?;
        check_status(response).await?;
        Ok(())
    }

    async fn profile(&self, token: &AuthToken) -> Result<ProfileResponse, QuizApiError> {
        let url = self.config.endpoint(&["api", "user", "profile"]);
        let response = self
            .client
            .get(url)
            .bearer_auth(token.expose())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }
}
