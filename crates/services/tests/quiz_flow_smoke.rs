use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{
    AttemptRecord, AuthToken, Question, QuizId, RawQuestion, Topic, TopicHistory,
};
use quiz_core::time::fixed_now;
use services::api::{QuizRecord, ResultSubmission, SharedQuiz};
use services::sessions::LoadOutcome;
use services::{
    AuthContext, Clock, QuizApi, QuizApiError, QuizSession, QuizSessionService, SessionPhase,
    SharedQuizService, SharedQuizSession, SubmissionStatus, SubmitPolicy,
};
use storage::repository::{CredentialRepository, InMemoryRepository};

#[derive(Default)]
struct FakeBackend {
    generated: Mutex<u32>,
    saved: Mutex<Vec<QuizRecord>>,
    submitted: Mutex<Vec<ResultSubmission>>,
    fail_generation: bool,
    fail_persist: bool,
    fail_submit: bool,
    reject_token: bool,
}

fn raw(question: &str, answer: &str, options: &[&str]) -> RawQuestion {
    RawQuestion {
        question: Some(question.to_string()),
        correct_answer: Some(answer.to_string()),
        options: Some(options.iter().map(ToString::to_string).collect()),
    }
}

#[async_trait]
impl QuizApi for FakeBackend {
    async fn generate_questions(&self, _topic: &Topic) -> Result<Vec<RawQuestion>, QuizApiError> {
        *self.generated.lock().unwrap() += 1;
        if self.fail_generation {
            return Err(QuizApiError::Generation("Model unavailable".into()));
        }
        Ok(vec![
            raw("Powerhouse of the cell?", "Mitochondria", &["Nucleus", "Mitochondria"]),
            raw("Basic unit of life?", "Cell", &["Atom", "Cell", "Organ"]),
        ])
    }

    async fn persist_quiz(&self, record: &QuizRecord) -> Result<(), QuizApiError> {
        if self.fail_persist {
            return Err(QuizApiError::Persistence("disk full".into()));
        }
        self.saved.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn fetch_quiz(&self, id: QuizId) -> Result<SharedQuiz, QuizApiError> {
        let saved = self.saved.lock().unwrap();
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
        if self.fail_submit {
            return Err(QuizApiError::Persistence("Failed to save result".into()));
        }
        self.submitted.lock().unwrap().push(submission.clone());
        Ok(())
    }

    async fn list_results(&self, _token: &AuthToken) -> Result<Vec<AttemptRecord>, QuizApiError> {
        Ok(Vec::new())
    }

    async fn topic_history(
        &self,
        _token: &AuthToken,
        topic: &Topic,
    ) -> Result<TopicHistory, QuizApiError> {
        Ok(TopicHistory {
            has_previous_attempts: true,
            previous_quizzes: vec![AttemptRecord {
                topic: topic.to_string(),
                score: 1,
                total_questions: 2,
                time_spent: Some(30),
                created_at: Some(fixed_now()),
            }],
        })
    }
}

fn auth(repo: Arc<InMemoryRepository>) -> AuthContext {
    AuthContext::new(repo, Clock::fixed(fixed_now()))
}

async fn signed_in() -> (AuthContext, Arc<InMemoryRepository>) {
    let repo = Arc::new(InMemoryRepository::new());
    let context = auth(repo.clone());
    context
        .establish(AuthToken::new("token").unwrap())
        .await
        .unwrap();
    (context, repo)
}

fn answer_everything_correctly(session: &mut QuizSession) {
    let answers: Vec<String> = session
        .questions()
        .iter()
        .map(|question| question.correct_answer().to_string())
        .collect();
    for (index, answer) in answers.iter().enumerate() {
        session.select_answer(index, answer).unwrap();
    }
}

#[tokio::test]
async fn full_flow_saves_quiz_and_result() {
    let backend = Arc::new(FakeBackend::default());
    let (auth, _) = signed_in().await;
    let service = QuizSessionService::new(backend.clone(), auth);

    let mut session = QuizSession::new("  Biology ");
    assert_eq!(service.load(&mut session).await.unwrap(), LoadOutcome::Activated);
    assert!(session.previous_attempts().has_previous_attempts);
    assert!(backend.saved.lock().unwrap().is_empty());
    service.persist(&session.record().unwrap()).await;
    assert_eq!(backend.saved.lock().unwrap()[0].uuid, session.id());

    session.start().unwrap();
    answer_everything_correctly(&mut session);
    for _ in 0..3 {
        session.tick();
    }
    let status = service.submit(&mut session).await.unwrap();
    assert_eq!(status, SubmissionStatus::Saved);

    let outcome = session.outcome().unwrap();
    assert_eq!(outcome.score.percentage_label(), "100.0%");
    let submitted = backend.submitted.lock().unwrap();
    assert_eq!(submitted[0].quiz_uuid, session.id());
    assert_eq!(submitted[0].time_spent, 3);
    assert_eq!(submitted[0].topic, "Biology");
}

#[tokio::test]
async fn blank_topic_never_generates() {
    let backend = Arc::new(FakeBackend::default());
    let service = QuizSessionService::new(backend.clone(), auth(Arc::new(InMemoryRepository::new())));
    let mut session = QuizSession::new("   ");
    assert!(service.load(&mut session).await.is_err());
    assert_eq!(session.phase(), SessionPhase::NoData);
    assert_eq!(*backend.generated.lock().unwrap(), 0);
}

#[tokio::test]
async fn persist_failure_does_not_block_the_attempt() {
    let backend = Arc::new(FakeBackend {
        fail_persist: true,
        ..FakeBackend::default()
    });
    let service = QuizSessionService::new(backend, auth(Arc::new(InMemoryRepository::new())));
    let mut session = QuizSession::new("Biology");
    assert_eq!(service.load(&mut session).await.unwrap(), LoadOutcome::Activated);
    service.persist(&session.record().unwrap()).await;
    assert_eq!(session.phase(), SessionPhase::Active);
}

/// A backend whose quiz save never answers.
struct StalledSave(FakeBackend);

#[async_trait]
impl QuizApi for StalledSave {
    async fn generate_questions(&self, topic: &Topic) -> Result<Vec<RawQuestion>, QuizApiError> {
        self.0.generate_questions(topic).await
    }

    async fn persist_quiz(&self, _record: &QuizRecord) -> Result<(), QuizApiError> {
        std::future::pending().await
    }

    async fn fetch_quiz(&self, id: QuizId) -> Result<SharedQuiz, QuizApiError> {
        self.0.fetch_quiz(id).await
    }

    async fn submit_result(
        &self,
        token: &AuthToken,
        submission: &ResultSubmission,
    ) -> Result<(), QuizApiError> {
        self.0.submit_result(token, submission).await
    }

    async fn list_results(&self, token: &AuthToken) -> Result<Vec<AttemptRecord>, QuizApiError> {
        self.0.list_results(token).await
    }

    async fn topic_history(
        &self,
        token: &AuthToken,
        topic: &Topic,
    ) -> Result<TopicHistory, QuizApiError> {
        self.0.topic_history(token, topic).await
    }
}

#[tokio::test]
async fn stalled_quiz_save_does_not_hold_up_activation() {
    let (auth, _) = signed_in().await;
    let service = QuizSessionService::new(Arc::new(StalledSave(FakeBackend::default())), auth);
    let mut session = QuizSession::new("Biology");

    let outcome = tokio::time::timeout(Duration::from_secs(2), service.load(&mut session))
        .await
        .expect("load finishes while the save is outstanding")
        .unwrap();
    assert_eq!(outcome, LoadOutcome::Activated);
    assert!(session.previous_attempts().has_previous_attempts);

    let record = session.record().unwrap();
    let save = tokio::spawn(async move { service.persist(&record).await });
    session.start().unwrap();
    answer_everything_correctly(&mut session);
    assert!(session.begin_submit().is_ok());
    save.abort();
}

#[tokio::test]
async fn generation_failure_then_manual_retry() {
    let backend = Arc::new(FakeBackend {
        fail_generation: true,
        ..FakeBackend::default()
    });
    let service = QuizSessionService::new(backend.clone(), auth(Arc::new(InMemoryRepository::new())));
    let mut session = QuizSession::new("Biology");
    assert_eq!(service.load(&mut session).await.unwrap(), LoadOutcome::Failed);
    assert_eq!(session.failure_message(), Some("Model unavailable"));

    assert_eq!(service.load(&mut session).await.unwrap(), LoadOutcome::Failed);
    assert_eq!(*backend.generated.lock().unwrap(), 2);
}

#[tokio::test]
async fn signed_out_submission_is_skipped_silently() {
    let backend = Arc::new(FakeBackend::default());
    let service = QuizSessionService::new(backend.clone(), auth(Arc::new(InMemoryRepository::new())));
    let mut session = QuizSession::new("Biology");
    service.load(&mut session).await.unwrap();
    assert!(!session.previous_attempts().has_previous_attempts);
    session.start().unwrap();
    answer_everything_correctly(&mut session);

    let status = service.submit(&mut session).await.unwrap();
    assert_eq!(status, SubmissionStatus::Skipped);
    assert_eq!(session.phase(), SessionPhase::Completed);
    assert!(backend.submitted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn fail_session_policy_turns_submit_failure_into_error() {
    let backend = Arc::new(FakeBackend {
        fail_submit: true,
        ..FakeBackend::default()
    });
    let (auth, _) = signed_in().await;
    let service =
        QuizSessionService::new(backend, auth).with_policy(SubmitPolicy::FailSession);
    let mut session = QuizSession::new("Biology");
    service.load(&mut session).await.unwrap();
    session.start().unwrap();
    answer_everything_correctly(&mut session);

    service.submit(&mut session).await.unwrap();
    assert_eq!(session.phase(), SessionPhase::Failed);
    assert_eq!(session.failure_message(), Some("Failed to save result"));
}

#[tokio::test]
async fn rejected_token_is_cleared_on_submit() {
    let backend = Arc::new(FakeBackend {
        reject_token: true,
        ..FakeBackend::default()
    });
    let (auth, repo) = signed_in().await;
    let service = QuizSessionService::new(backend, auth.clone());
    let mut session = QuizSession::new("Biology");
    service.load(&mut session).await.unwrap();
    session.start().unwrap();
    answer_everything_correctly(&mut session);

    let status = service.submit(&mut session).await.unwrap();
    assert!(matches!(status, SubmissionStatus::Failed(_)));
    assert_eq!(session.phase(), SessionPhase::Completed);
    assert!(!auth.is_authenticated());
    assert!(repo.load_credential().await.unwrap().is_none());
}

#[tokio::test]
async fn shared_quiz_is_fetched_by_identifier() {
    let backend = Arc::new(FakeBackend::default());
    let context = auth(Arc::new(InMemoryRepository::new()));
    let primary = QuizSessionService::new(backend.clone(), context.clone());
    let mut session = QuizSession::new("Biology");
    primary.load(&mut session).await.unwrap();

    let shared_service = SharedQuizService::new(backend, context);
    let mut shared = SharedQuizSession::new(session.id());
    assert_eq!(
        shared_service.load(&mut shared).await.unwrap(),
        LoadOutcome::Activated
    );
    assert_eq!(shared.topic(), "Biology");
    let mut texts: Vec<&str> = shared.questions().iter().map(Question::text).collect();
    texts.sort_unstable();
    assert_eq!(texts, ["Basic unit of life?", "Powerhouse of the cell?"]);

    shared.start().unwrap();
    let first = shared.questions()[0].correct_answer().to_string();
    shared.select_answer(0, &first).unwrap();
    let second = shared.questions()[1].options()[0].clone();
    shared.select_answer(1, &second).unwrap();
    let status = shared_service.submit(&mut shared).await.unwrap();
    assert_eq!(status, SubmissionStatus::Skipped);
    assert_eq!(shared.outcome().unwrap().score.total, 2);

    // The primary session is untouched by the shared attempt.
    assert!(session.sheet().unwrap().answers().is_empty());
}

#[tokio::test]
async fn unknown_shared_quiz_ends_in_error_state() {
    let backend = Arc::new(FakeBackend::default());
    let service = SharedQuizService::new(backend, auth(Arc::new(InMemoryRepository::new())));
    let mut shared = SharedQuizSession::new(QuizId::generate());
    assert_eq!(service.load(&mut shared).await.unwrap(), LoadOutcome::Failed);
    assert_eq!(shared.phase(), SessionPhase::Failed);
    assert!(shared.failure_message().unwrap().contains("Quiz not found"));
}
