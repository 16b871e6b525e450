use quiz_core::model::{AttemptRecord, TopicHistory};
use services::{QuizSession, SessionPhase, SharedQuizSession};

use super::components::QuizScreen;
use crate::vm::{AttemptRowVm, map_attempt, map_attempt_rows, map_preview, map_result};

pub(crate) fn quiz_screen(session: Option<&QuizSession>) -> QuizScreen {
    let Some(session) = session else {
        return QuizScreen::Loading;
    };
    let topic = session.topic().map(ToString::to_string).unwrap_or_default();
    match session.phase() {
        SessionPhase::Intake | SessionPhase::Loading => QuizScreen::Loading,
        SessionPhase::NoData => QuizScreen::NoData,
        SessionPhase::Closed => QuizScreen::Closed,
        SessionPhase::Failed => QuizScreen::Failed(
            session.failure_message().unwrap_or_default().to_string(),
        ),
        SessionPhase::Active | SessionPhase::Submitting => match session.sheet() {
            Some(sheet) if session.is_started() => QuizScreen::Attempt(map_attempt(
                sheet,
                session.progress(),
                session.can_submit(),
            )),
            _ => QuizScreen::Preview(map_preview(
                &topic,
                session.questions(),
                session.previous_attempts(),
            )),
        },
        SessionPhase::Completed => match (session.outcome(), session.sheet()) {
            (Some(outcome), Some(sheet)) => QuizScreen::Result(map_result(&topic, outcome, sheet)),
            _ => QuizScreen::Closed,
        },
    }
}

/// Shared quizzes have no topic history, so the preview never lists attempts.
pub(crate) fn shared_screen(session: Option<&SharedQuizSession>) -> QuizScreen {
    let Some(session) = session else {
        return QuizScreen::Loading;
    };
    match session.phase() {
        SessionPhase::Intake | SessionPhase::Loading => QuizScreen::Loading,
        SessionPhase::NoData => QuizScreen::NoData,
        SessionPhase::Closed => QuizScreen::Closed,
        SessionPhase::Failed => QuizScreen::Failed(
            session.failure_message().unwrap_or_default().to_string(),
        ),
        SessionPhase::Active | SessionPhase::Submitting => match session.sheet() {
            Some(sheet) if session.is_started() => QuizScreen::Attempt(map_attempt(
                sheet,
                session.progress(),
                session.can_submit(),
            )),
            _ => QuizScreen::Preview(map_preview(
                session.topic(),
                session.questions(),
                &TopicHistory::default(),
            )),
        },
        SessionPhase::Completed => match (session.outcome(), session.sheet()) {
            (Some(outcome), Some(sheet)) => {
                QuizScreen::Result(map_result(session.topic(), outcome, sheet))
            }
            _ => QuizScreen::Closed,
        },
    }
}

pub(crate) fn attempt_rows(records: Option<&Vec<AttemptRecord>>) -> Vec<AttemptRowVm> {
    records.map(|records| map_attempt_rows(records)).unwrap_or_default()
}
