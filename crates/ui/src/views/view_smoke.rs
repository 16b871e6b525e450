use std::sync::Mutex;

use quiz_core::model::{Question, QuizId, Topic};
use services::api::QuizRecord;
use services::error::{GENERATION_FALLBACK, NOT_FOUND_MESSAGE};
use services::sessions::INVALID_LINK_MESSAGE;
use services::SessionPhase;

use super::test_harness::{FakeBackend, ViewKind, attempt, setup_view_harness};
use crate::vm::QuizIntent;

fn stored_quiz(id: QuizId) -> QuizRecord {
    QuizRecord {
        uuid: id,
        topic: Topic::new("History").expect("topic"),
        questions: vec![
            Question::new("First emperor of Rome?", "Augustus", vec![
                "Nero".into(),
                "Augustus".into(),
            ]),
        ],
    }
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_lists_preset_topics() {
    let mut harness = setup_view_harness(ViewKind::Home, FakeBackend::default(), false).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Generate Quiz"), "missing button in {html}");
    assert!(html.contains("Artificial Intelligence"), "missing preset in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_blank_topic_has_no_data() {
    let mut harness =
        setup_view_harness(ViewKind::Quiz("   ".into()), FakeBackend::default(), false).await;
    harness.rebuild();
    let html = harness.drive_until("No Quiz Data").await;
    assert!(
        html.contains("No quiz data found. Please go back and select a topic."),
        "missing message in {html}"
    );
    assert!(harness.backend.saved.lock().expect("saved").is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_preview_with_previous_attempts() {
    let backend = FakeBackend {
        history: vec![attempt("Math", 3, 4)],
        ..FakeBackend::default()
    };
    let mut harness = setup_view_harness(ViewKind::Quiz("Math".into()), backend, true).await;
    harness.rebuild();
    let html = harness.drive_until("Quiz Preview: Math").await;
    assert!(html.contains("Quiz Preview: Math"), "missing preview in {html}");
    assert!(html.contains("Your Previous Attempts"), "missing attempts in {html}");
    assert!(html.contains("75.0%"), "missing percentage in {html}");
    assert!(html.contains("Correct Answer"), "missing answer badge in {html}");
    for _ in 0..5 {
        if !harness.backend.saved.lock().expect("saved").is_empty() {
            break;
        }
        harness.drive_async().await;
    }
    assert_eq!(harness.backend.saved.lock().expect("saved").len(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_preview_shows_while_save_is_pending() {
    let backend = FakeBackend {
        stall_save: true,
        ..FakeBackend::default()
    };
    let mut harness = setup_view_harness(ViewKind::Quiz("Math".into()), backend, false).await;
    harness.rebuild();
    let html = harness.drive_until("Quiz Preview: Math").await;
    assert!(html.contains("Start Quiz"), "preview blocked by save in {html}");
    assert!(!html.contains("Generating your quiz"), "still loading in {html}");
    assert!(harness.backend.saved.lock().expect("saved").is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_generation_failure_offers_retry() {
    let backend = FakeBackend {
        fail_generation: true,
        ..FakeBackend::default()
    };
    let mut harness = setup_view_harness(ViewKind::Quiz("Math".into()), backend, false).await;
    harness.rebuild();
    let html = harness.drive_until(GENERATION_FALLBACK).await;
    assert!(html.contains(GENERATION_FALLBACK), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_attempt_submits_and_shows_result() {
    let mut harness =
        setup_view_harness(ViewKind::Quiz("Math".into()), FakeBackend::default(), true).await;
    harness.rebuild();
    harness.drive_until("Quiz Preview").await;

    let handles = harness.quiz_handles.clone().expect("quiz handles");
    let dispatch = handles.dispatch();
    let session = handles.session();

    harness.dom.in_runtime(|| dispatch.call(QuizIntent::Start));
    let html = harness.drive_until("Question 1 of 2").await;
    assert!(html.contains("Time: "), "missing timer in {html}");

    let answers: Vec<String> = harness.dom.in_runtime(|| {
        session
            .peek()
            .as_ref()
            .map(|current| {
                current
                    .questions()
                    .iter()
                    .map(|question| question.correct_answer().to_string())
                    .collect()
            })
            .unwrap_or_default()
    });
    assert_eq!(answers.len(), 2);
    for (index, option) in answers.into_iter().enumerate() {
        harness
            .dom
            .in_runtime(|| dispatch.call(QuizIntent::Select { index, option }));
        harness.drive_async().await;
    }
    harness.dom.in_runtime(|| dispatch.call(QuizIntent::Submit));
    let html = harness.drive_until("Quiz Result").await;

    assert!(html.contains("2 / 2"), "missing score in {html}");
    assert!(html.contains("Result saved to your profile"), "missing saved note in {html}");
    let phase = harness
        .dom
        .in_runtime(|| session.peek().as_ref().map(|current| current.phase()));
    assert_eq!(phase, Some(SessionPhase::Completed));
    let submitted = harness.backend.submitted.lock().expect("submitted");
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].score, 2);
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_submit_with_missing_answers_is_refused() {
    let mut harness =
        setup_view_harness(ViewKind::Quiz("Math".into()), FakeBackend::default(), true).await;
    harness.rebuild();
    harness.drive_until("Quiz Preview").await;

    let handles = harness.quiz_handles.clone().expect("quiz handles");
    let dispatch = handles.dispatch();
    harness.dom.in_runtime(|| dispatch.call(QuizIntent::Start));
    harness.drive_async().await;
    harness.dom.in_runtime(|| dispatch.call(QuizIntent::Submit));
    let html = harness.drive_until("answer every question").await;

    assert!(html.contains("answer every question"), "missing refusal in {html}");
    assert!(harness.backend.submitted.lock().expect("submitted").is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn shared_view_smoke_invalid_link_has_no_retry() {
    let mut harness =
        setup_view_harness(ViewKind::Shared("not-a-quiz".into()), FakeBackend::default(), false)
            .await;
    harness.rebuild();
    let html = harness.drive_until(INVALID_LINK_MESSAGE).await;
    assert!(html.contains(INVALID_LINK_MESSAGE), "missing error in {html}");
    assert!(!html.contains("Retry"), "unexpected retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn shared_view_smoke_unknown_quiz_offers_retry() {
    let id = QuizId::generate();
    let mut harness =
        setup_view_harness(ViewKind::Shared(id.to_string()), FakeBackend::default(), false).await;
    harness.rebuild();
    let html = harness.drive_until(NOT_FOUND_MESSAGE).await;
    assert!(html.contains(NOT_FOUND_MESSAGE), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn shared_view_smoke_renders_stored_quiz() {
    let id = QuizId::generate();
    let backend = FakeBackend {
        saved: Mutex::new(vec![stored_quiz(id)]),
        ..FakeBackend::default()
    };
    let mut harness = setup_view_harness(ViewKind::Shared(id.to_string()), backend, false).await;
    harness.rebuild();
    let html = harness.drive_until("Quiz Preview: History").await;
    assert!(html.contains("Shared Quiz"), "missing banner in {html}");
    assert!(html.contains("First emperor of Rome?"), "missing question in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn profile_view_smoke_renders_stats_and_history() {
    let backend = FakeBackend {
        history: vec![attempt("Math", 3, 4), attempt("Art", 1, 2)],
        ..FakeBackend::default()
    };
    let mut harness = setup_view_harness(ViewKind::Profile, backend, true).await;
    harness.rebuild();
    let html = harness.drive_until("Ada Lovelace").await;
    assert!(html.contains("ada@example.com"), "missing email in {html}");
    assert!(html.contains("Total Quizzes"), "missing stats in {html}");
    assert!(html.contains("66.7%"), "missing average in {html}");
    assert!(html.contains("75.0%"), "missing highest in {html}");
    assert!(html.contains("4 / 6"), "missing correct count in {html}");
    assert!(html.contains("Art"), "missing history row in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn signup_view_smoke_lists_password_rules() {
    let mut harness = setup_view_harness(ViewKind::SignUp, FakeBackend::default(), false).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Create Account"), "missing title in {html}");
    assert!(html.contains("At least 8 characters"), "missing rule in {html}");
    assert!(html.contains("One special character"), "missing rule in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn signin_view_smoke_renders_form() {
    let mut harness = setup_view_harness(ViewKind::SignIn, FakeBackend::default(), false).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("signin-email"), "missing email field in {html}");
    assert!(html.contains("Sign up"), "missing sign-up link in {html}");
}
