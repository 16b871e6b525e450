use rand::Rng;
use tracing::debug;

use quiz_core::model::{Question, QuizId, RawQuestion, Score, Topic, TopicHistory};

use super::progress::SessionProgress;
use super::sheet::AnswerSheet;
use crate::api::{QuizRecord, ResultSubmission, SubmittedAnswer};
use crate::error::{GENERATION_FALLBACK, QuizApiError, SessionError};

//
// ─── PHASES AND OUTCOMES ───────────────────────────────────────────────────────
//

/// Coarse lifecycle position of a session, without the data each phase carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Intake,
    Loading,
    Active,
    Submitting,
    Completed,
    Failed,
    NoData,
    Closed,
}

/// What happened to the result-persistence call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Saved,
    /// No credential was present, so nothing was sent.
    Skipped,
    Failed(String),
}

/// How a failed result submission affects the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitPolicy {
    /// Show the result anyway and report the failure alongside it.
    #[default]
    ReportFailure,
    /// Move to the error state instead of the result.
    FailSession,
}

/// Final result of an attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizOutcome {
    pub score: Score,
    pub elapsed_secs: u32,
    pub submission: SubmissionStatus,
}

/// Issued when a load starts; completing with an outdated ticket is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// Issued when a submission starts; completing with an outdated ticket is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    generation: u64,
}

impl LoadTicket {
    pub(crate) fn new(generation: u64) -> Self {
        Self { generation }
    }

    pub(crate) fn generation(self) -> u64 {
        self.generation
    }
}

impl SubmitTicket {
    pub(crate) fn new(generation: u64) -> Self {
        Self { generation }
    }

    pub(crate) fn generation(self) -> u64 {
        self.generation
    }
}

/// Result of feeding a fetch result back into a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Activated,
    Failed,
    /// The session moved on (or was torn down) while the request was in flight.
    Stale,
}

/// Everything the backend needs to record an attempt, captured at submit time.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub ticket: SubmitTicket,
    pub quiz_id: QuizId,
    pub topic: String,
    pub score: Score,
    pub elapsed_secs: u32,
    pub answers: Vec<SubmittedAnswer>,
}

impl PendingSubmission {
    #[must_use]
    pub fn to_submission(&self) -> ResultSubmission {
        ResultSubmission {
            topic: self.topic.clone(),
            score: self.score.correct,
            total_questions: self.score.total,
            time_spent: self.elapsed_secs,
            quiz_uuid: self.quiz_id,
            answers: self.answers.clone(),
        }
    }
}

/// Normalizes and shuffles fetched questions; `None` when there are none.
pub(crate) fn prepare_questions<R: Rng + ?Sized>(
    raw: Vec<RawQuestion>,
    rng: &mut R,
) -> Option<Vec<Question>> {
    if raw.is_empty() {
        return None;
    }
    Some(
        raw.into_iter()
            .map(|raw| Question::from_raw(raw).shuffled_with(rng))
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    Intake,
    Loading,
    Active { started: bool },
    Submitting,
    Completed(QuizOutcome),
    Failed { message: String },
    NoData,
    Closed,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One topic → questions → answers → score attempt.
///
/// The identifier is generated once and never changes, retries included.
/// Network calls happen outside; the session only issues tickets and accepts
/// their results, ignoring any that arrive after it moved on.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: QuizId,
    topic: Option<Topic>,
    state: State,
    sheet: Option<AnswerSheet>,
    previous: TopicHistory,
    generation: u64,
}

impl QuizSession {
    /// Starts at intake, or at `NoData` when the topic is blank.
    #[must_use]
    pub fn new(raw_topic: &str) -> Self {
        Self::with_id(QuizId::generate(), raw_topic)
    }

    #[must_use]
    pub fn with_id(id: QuizId, raw_topic: &str) -> Self {
        let topic = Topic::new(raw_topic).ok();
        let state = if topic.is_some() {
            State::Intake
        } else {
            State::NoData
        };
        Self {
            id,
            topic,
            state,
            sheet: None,
            previous: TopicHistory::default(),
            generation: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn topic(&self) -> Option<&Topic> {
        self.topic.as_ref()
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
            State::NoData => SessionPhase::NoData,
            State::Closed => SessionPhase::Closed,
        }
    }

    /// True once the timed attempt has begun (preview finished).
    #[must_use]
    pub fn is_started(&self) -> bool {
        matches!(self.state, State::Active { started: true } | State::Submitting)
            || matches!(self.state, State::Completed(_))
    }

    #[must_use]
    pub fn sheet(&self) -> Option<&AnswerSheet> {
        self.sheet.as_ref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        self.sheet.as_ref().map(AnswerSheet::questions).unwrap_or_default()
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
    pub fn previous_attempts(&self) -> &TopicHistory {
        &self.previous
    }

    pub fn set_previous_attempts(&mut self, history: TopicHistory) {
        self.previous = history;
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

    /// Body for persisting the freshly generated quiz.
    #[must_use]
    pub fn record(&self) -> Option<QuizRecord> {
        let topic = self.topic.clone()?;
        let sheet = self.sheet.as_ref()?;
        Some(QuizRecord {
            uuid: self.id,
            topic,
            questions: sheet.questions().to_vec(),
        })
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

    // ─── Loading ───────────────────────────────────────────────────────────────

    /// Enters `Loading` from intake, or from a failure as a manual retry,
    /// and hands back the topic to generate for.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` without a topic or from any
    /// other phase.
    pub fn begin_loading(&mut self) -> Result<(LoadTicket, Topic), SessionError> {
        let Some(topic) = self.topic.clone() else {
            return Err(self.invalid("load questions without a topic"));
        };
        if !matches!(self.state, State::Intake | State::Failed { .. }) {
            return Err(self.invalid("load questions"));
        }
        self.sheet = None;
        self.state = State::Loading;
        debug!(quiz_id = %self.id, "session loading");
        Ok((LoadTicket::new(self.next_generation()), topic))
    }

    /// Applies the generation result. Options are shuffled here, once per load.
    pub fn finish_loading<R: Rng + ?Sized>(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<RawQuestion>, QuizApiError>,
        rng: &mut R,
    ) -> LoadOutcome {
        if ticket.generation() != self.generation || self.state != State::Loading {
            debug!(quiz_id = %self.id, "ignoring stale load result");
            return LoadOutcome::Stale;
        }
        let questions = match result {
            Ok(raw) => prepare_questions(raw, rng),
            Err(err) => {
                self.state = State::Failed {
                    message: err.user_message(),
                };
                return LoadOutcome::Failed;
            }
        };
        match questions {
            Some(questions) => {
                debug!(quiz_id = %self.id, count = questions.len(), "session active");
                self.sheet = Some(AnswerSheet::new(questions));
                self.state = State::Active { started: false };
                LoadOutcome::Activated
            }
            None => {
                self.state = State::Failed {
                    message: GENERATION_FALLBACK.to_string(),
                };
                LoadOutcome::Failed
            }
        }
    }

    // ─── Answering ─────────────────────────────────────────────────────────────

    /// Leaves the preview and begins the timed attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is active.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.state {
            State::Active { .. } => {
                self.state = State::Active { started: true };
                Ok(())
            }
            _ => Err(self.invalid("start")),
        }
    }

    fn answering_sheet(&mut self, action: &'static str) -> Result<&mut AnswerSheet, SessionError> {
        if self.state != (State::Active { started: true }) {
            return Err(self.invalid(action));
        }
        match self.sheet.as_mut() {
            Some(sheet) => Ok(sheet),
            None => Err(SessionError::InvalidTransition {
                phase: SessionPhase::Active,
                action,
            }),
        }
    }

    /// Records or overwrites the answer for `index`.
    ///
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

    /// Jumps to any question, answered or not.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` outside a started attempt or for an index past the set.
    pub fn jump_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.answering_sheet("jump")?
            .jump_to(index)
            .map_err(SessionError::from)
    }

    /// One wall-clock second. Ignored unless the attempt is running.
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

    // ─── Submission ────────────────────────────────────────────────────────────

    /// Freezes the timer and computes the score before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside a started attempt and
    /// `SessionError::Validation` while any question is unanswered.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SessionError> {
        let sheet = self.answering_sheet("submit")?;
        sheet.ensure_complete()?;
        let score = sheet.score();
        let elapsed_secs = sheet.elapsed_secs();
        let answers = sheet.submitted_answers();
        let topic = self
            .topic
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        self.state = State::Submitting;
        let ticket = SubmitTicket::new(self.next_generation());
        debug!(quiz_id = %self.id, score = score.correct, total = score.total, "submitting");
        Ok(PendingSubmission {
            ticket,
            quiz_id: self.id,
            topic,
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
            debug!(quiz_id = %self.id, "ignoring stale submission result");
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

    // ─── Teardown ──────────────────────────────────────────────────────────────

    /// True while leaving would lose an attempt in progress.
    #[must_use]
    pub fn guards_exit(&self) -> bool {
        self.state == (State::Active { started: true })
    }

    /// Drops all in-memory state; outstanding results become stale.
    pub fn discard(&mut self) {
        self.next_generation();
        self.sheet = None;
        self.previous = TopicHistory::default();
        self.state = State::Closed;
        debug!(quiz_id = %self.id, "session discarded");
    }
}
