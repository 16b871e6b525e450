use rand::Rng;
use tracing::debug;

use quiz_core::model::{Question, QuizId};
use quiz_core::share::parse_share_target;

use super::machine::{
    LoadOutcome, LoadTicket, PendingSubmission, QuizOutcome, SessionPhase, SubmissionStatus,
    SubmitPolicy, SubmitTicket,
};
use super::progress::SessionProgress;
use super::sheet::AnswerSheet;
use crate::api::SharedQuiz;
use crate::error::{NOT_FOUND_MESSAGE, QuizApiError, SessionError};

pub const INVALID_LINK_MESSAGE: &str = "Invalid quiz link. No UUID provided.";

#[derive(Debug, Clone, PartialEq)]
enum State {
    Intake,
    Loading,
    Active { started: bool },
    Submitting,
    Completed(QuizOutcome),
    Failed { message: String },
    Closed,
}

/// An attempt at a quiz someone else generated, fetched by its identifier.
///
/// Keeps its own answers and progress. Restarting clears them but keeps the
/// fetched questions in the order they were first shuffled.
#[derive(Debug, Clone)]
pub struct SharedQuizSession {
    id: Option<QuizId>,
    topic: String,
    state: State,
    sheet: Option<AnswerSheet>,
    generation: u64,
}

impl SharedQuizSession {
    #[must_use]
    pub fn new(id: QuizId) -> Self {
        Self {
            id: Some(id),
            topic: String::new(),
            state: State::Intake,
            sheet: None,
            generation: 0,
        }
    }

    /// Accepts a bare identifier or a full share link.
    #[must_use]
    pub fn from_target(raw: &str) -> Self {
        match parse_share_target(raw) {
            Some(id) => Self::new(id),
            None => Self {
                id: None,
                topic: String::new(),
                state: State::Failed {
                    message: INVALID_LINK_MESSAGE.to_string(),
                },
                sheet: None,
                generation: 0,
            },
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<QuizId> {
        self.id
    }

    /// Topic as stored with the quiz; empty until loaded.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self.state {
            State::Intake => SessionPhase::Intake,
            State::Loading => SessionPhase::Loading,
            State::Active { .. } => SessionPhase::Active,
            State::Submitting => SessionPhase::Submitting,
            State::Completed(_) => SessionPhase::Completed,
            State::Failed { .. } => SessionPhase::Failed,
            State::Closed => SessionPhase::Closed,
        }
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        matches!(
            self.state,
            State::Active { started: true } | State::Submitting | State::Completed(_)
        )
    }

    #[must_use]
    pub fn sheet(&self) -> Option<&AnswerSheet> {
        self.sheet.as_ref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        self.sheet
            .as_ref()
            .map(AnswerSheet::questions)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&QuizOutcome> {
        match &self.state {
            State::Completed(outcome) => Some(outcome),
            _ => None,
        }
    }

    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        match &self.state {
            State::Failed { message } => Some(message.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let Some(sheet) = &self.sheet else {
            return SessionProgress::empty();
        };
        SessionProgress {
            total: sheet.total(),
            answered: sheet.answers().len(),
            current_index: sheet.current_index(),
            elapsed_secs: sheet.elapsed_secs(),
            started: self.is_started(),
            submitting: self.phase() == SessionPhase::Submitting,
            is_complete: sheet.is_complete(),
        }
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            phase: self.phase(),
            action,
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Enters `Loading`; also the retry path after a failed fetch.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` without a valid identifier or
    /// from any phase other than intake and failure.
    pub fn begin_loading(&mut self) -> Result<(LoadTicket, QuizId), SessionError> {
        let Some(id) = self.id else {
            return Err(self.invalid("fetch a quiz without an identifier"));
        };
        if !matches!(self.state, State::Intake | State::Failed { .. }) {
            return Err(self.invalid("fetch the quiz"));
        }
        self.sheet = None;
        self.state = State::Loading;
        debug!(quiz_id = %id, "shared quiz loading");
        Ok((LoadTicket::new(self.next_generation()), id))
    }

    /// Applies the fetch result, shuffling options once.
    pub fn finish_loading<R: Rng + ?Sized>(
        &mut self,
        ticket: LoadTicket,
        result: Result<SharedQuiz, QuizApiError>,
        rng: &mut R,
    ) -> LoadOutcome {
        if ticket.generation() != self.generation || self.state != State::Loading {
            return LoadOutcome::Stale;
        }
        let quiz = match result {
            Ok(quiz) => quiz,
            Err(err) => {
                self.state = State::Failed {
                    message: err.user_message(),
                };
                return LoadOutcome::Failed;
            }
        };
        let questions: Vec<Question> = quiz
            .questions
            .iter()
            .map(|question| question.shuffled_with(rng))
            .collect();
        if questions.is_empty() {
            self.state = State::Failed {
                message: NOT_FOUND_MESSAGE.to_string(),
            };
            return LoadOutcome::Failed;
        }
        self.topic = quiz.topic;
        self.sheet = Some(AnswerSheet::new(questions));
        self.state = State::Active { started: false };
        LoadOutcome::Activated
    }

    /// Begins the attempt from the preview.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the quiz is loaded.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.state {
            State::Active { .. } => {
                self.state = State::Active { started: true };
                Ok(())
            }
            _ => Err(self.invalid("start")),
        }
    }

    /// Clears answers, cursor and timer and begins again with the same questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` before the quiz is loaded or
    /// while a submission is in flight.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if !matches!(self.state, State::Active { .. } | State::Completed(_)) {
            return Err(self.invalid("restart"));
        }
        match self.sheet.as_mut() {
            Some(sheet) => sheet.reset(),
            None => return Err(self.invalid("restart")),
        }
        self.next_generation();
        self.state = State::Active { started: true };
        Ok(())
    }

    fn answering_sheet(&mut self, action: &'static str) -> Result<&mut AnswerSheet, SessionError> {
        if self.state != (State::Active { started: true }) {
            return Err(self.invalid(action));
        }
        self.sheet.as_mut().ok_or(SessionError::InvalidTransition {
            phase: SessionPhase::Active,
            action,
        })
    }

    /// # Errors
    ///
    /// Returns `SessionError` outside a started attempt or for an invalid answer.
    pub fn select_answer(&mut self, index: usize, option: &str) -> Result<(), SessionError> {
        self.answering_sheet("select an answer")?
            .select(index, option)
            .map_err(SessionError::from)
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside a started attempt.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        self.answering_sheet("advance")?.advance();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside a started attempt.
    pub fn retreat(&mut self) -> Result<(), SessionError> {
        self.answering_sheet("go back")?.retreat();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError` outside a started attempt or for an index past the set.
    pub fn jump_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.answering_sheet("jump")?
            .jump_to(index)
            .map_err(SessionError::from)
    }

    pub fn tick(&mut self) -> bool {
        match self.answering_sheet("tick") {
            Ok(sheet) => {
                sheet.tick();
                true
            }
            Err(_) => false,
        }
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.state == (State::Active { started: true })
            && self.sheet.as_ref().is_some_and(AnswerSheet::is_complete)
    }

    /// # Errors
    ///
    /// Returns `SessionError` outside a started attempt or while any question is unanswered.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SessionError> {
        let Some(quiz_id) = self.id else {
            return Err(self.invalid("submit"));
        };
        let sheet = self.answering_sheet("submit")?;
        sheet.ensure_complete()?;
        let score = sheet.score();
        let elapsed_secs = sheet.elapsed_secs();
        let answers = sheet.submitted_answers();
        self.state = State::Submitting;
        let ticket = SubmitTicket::new(self.next_generation());
        Ok(PendingSubmission {
            ticket,
            quiz_id,
            topic: self.topic.clone(),
            score,
            elapsed_secs,
            answers,
        })
    }

    /// Applies the persistence result. Returns `false` for a stale ticket.
    pub fn finish_submit(
        &mut self,
        pending: &PendingSubmission,
        status: SubmissionStatus,
        policy: SubmitPolicy,
    ) -> bool {
        if pending.ticket.generation() != self.generation || self.state != State::Submitting {
            return false;
        }
        self.state = match (status, policy) {
            (SubmissionStatus::Failed(message), SubmitPolicy::FailSession) => {
                State::Failed { message }
            }
            (submission, _) => State::Completed(QuizOutcome {
                score: pending.score,
                elapsed_secs: pending.elapsed_secs,
                submission,
            }),
        };
        true
    }

    #[must_use]
    pub fn guards_exit(&self) -> bool {
        self.state == (State::Active { started: true })
    }

    pub fn discard(&mut self) {
        self.next_generation();
        self.sheet = None;
        self.state = State::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn quiz(id: QuizId) -> SharedQuiz {
        SharedQuiz {
            id,
            topic: "History".into(),
            questions: vec![
                Question::new("Year?", "1066", vec!["1066".into(), "1215".into()]),
                Question::new("King?", "Harold", vec!["Harold".into(), "John".into()]),
            ],
        }
    }

    fn loaded() -> SharedQuizSession {
        let id = QuizId::generate();
        let mut session = SharedQuizSession::new(id);
        let (ticket, fetch_id) = session.begin_loading().unwrap();
        assert_eq!(fetch_id, id);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            session.finish_loading(ticket, Ok(quiz(id)), &mut rng),
            LoadOutcome::Activated
        );
        session
    }

    #[test]
    fn unknown_identifier_fails_with_not_found_message() {
        let mut session = SharedQuizSession::new(QuizId::generate());
        let (ticket, _) = session.begin_loading().unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            session.finish_loading(ticket, Err(QuizApiError::NotFound), &mut rng),
            LoadOutcome::Failed
        );
        assert_eq!(session.failure_message(), Some(NOT_FOUND_MESSAGE));
        assert!(session.begin_loading().is_ok());
    }

    #[test]
    fn malformed_link_fails_without_fetching() {
        let mut session = SharedQuizSession::from_target("not-a-quiz");
        assert_eq!(session.failure_message(), Some(INVALID_LINK_MESSAGE));
        assert!(session.begin_loading().is_err());
    }

    #[test]
    fn restart_clears_progress_and_keeps_option_order() {
        let mut session = loaded();
        let before: Vec<Question> = session.questions().to_vec();
        session.start().unwrap();
        session.select_answer(0, "1066").unwrap();
        session.select_answer(1, "John").unwrap();
        session.tick();
        let pending = session.begin_submit().unwrap();
        assert!(session.finish_submit(
            &pending,
            SubmissionStatus::Skipped,
            SubmitPolicy::default()
        ));
        assert_eq!(session.outcome().unwrap().score.correct, 1);

        session.restart().unwrap();
        assert_eq!(session.phase(), SessionPhase::Active);
        assert!(session.is_started());
        assert_eq!(session.questions(), before.as_slice());
        let progress = session.progress();
        assert_eq!(progress.answered, 0);
        assert_eq!(progress.elapsed_secs, 0);
    }

    #[test]
    fn submission_failure_still_shows_result_by_default() {
        let mut session = loaded();
        session.start().unwrap();
        session.select_answer(0, "1066").unwrap();
        session.select_answer(1, "Harold").unwrap();
        let pending = session.begin_submit().unwrap();
        assert_eq!(pending.topic, "History");
        let failed = SubmissionStatus::Failed("offline".into());
        session.finish_submit(&pending, failed.clone(), SubmitPolicy::ReportFailure);
        let outcome = session.outcome().unwrap();
        assert_eq!(outcome.submission, failed);
        assert_eq!(outcome.score.correct, 2);
    }

    #[test]
    fn result_after_teardown_is_ignored() {
        let id = QuizId::generate();
        let mut session = SharedQuizSession::new(id);
        let (ticket, _) = session.begin_loading().unwrap();
        session.discard();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            session.finish_loading(ticket, Ok(quiz(id)), &mut rng),
            LoadOutcome::Stale
        );
        assert_eq!(session.phase(), SessionPhase::Closed);
    }
}
