use std::sync::Arc;

use tracing::{debug, info, warn};

use quiz_core::model::{AttemptRecord, TopicHistory};

use super::machine::{
    LoadOutcome, PendingSubmission, QuizSession, SubmissionStatus, SubmitPolicy,
};
use crate::api::{QuizApi, QuizRecord, ResultSubmission};
use crate::auth::AuthContext;
use crate::error::{QuizApiError, SessionError};

/// Sends a finished attempt to the backend when a credential is present.
///
/// A rejected credential is forgotten so the next screen asks for sign-in.
pub(crate) async fn deliver_result(
    api: &dyn QuizApi,
    auth: &AuthContext,
    submission: &ResultSubmission,
) -> SubmissionStatus {
    let Some(token) = auth.token() else {
        debug!("no credential, result not submitted");
        return SubmissionStatus::Skipped;
    };
    match api.submit_result(&token, submission).await {
        Ok(()) => {
            info!(quiz_id = %submission.quiz_uuid, score = submission.score, "result saved");
            SubmissionStatus::Saved
        }
        Err(QuizApiError::Unauthorized) => {
            warn!("credential rejected while saving result");
            auth.invalidate().await;
            SubmissionStatus::Failed(QuizApiError::Unauthorized.user_message())
        }
        Err(err) => {
            warn!(error = %err, "failed to save result");
            SubmissionStatus::Failed(err.user_message())
        }
    }
}

/// Drives a [`QuizSession`] through its network-bound transitions.
#[derive(Clone)]
pub struct QuizSessionService {
    api: Arc<dyn QuizApi>,
    auth: AuthContext,
    policy: SubmitPolicy,
}

impl QuizSessionService {
    #[must_use]
    pub fn new(api: Arc<dyn QuizApi>, auth: AuthContext) -> Self {
        Self {
            api,
            auth,
            policy: SubmitPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: SubmitPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// Generates questions and activates the session. The topic history
    /// lookup runs alongside generation and never blocks activation.
    ///
    /// Saving the quiz is left to [`Self::persist`] so the caller can run it
    /// in the background once the session is usable.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` if the session cannot load.
    /// Backend failures end in the session's failed phase instead.
    pub async fn load(&self, session: &mut QuizSession) -> Result<LoadOutcome, SessionError> {
        let (ticket, topic) = session.begin_loading()?;

        let (history, result) =
            tokio::join!(self.topic_history(&topic), self.api.generate_questions(&topic));
        if let Err(err) = &result {
            warn!(topic = %topic, error = %err, "question generation failed");
        }
        let outcome = session.finish_loading(ticket, result, &mut rand::rng());
        if outcome == LoadOutcome::Activated {
            session.set_previous_attempts(history);
        }
        Ok(outcome)
    }

    /// Stores a generated quiz so it can be shared. Failures are logged only.
    pub async fn persist(&self, record: &QuizRecord) {
        match self.api.persist_quiz(record).await {
            Ok(()) => info!(quiz_id = %record.uuid, topic = %record.topic, "quiz saved"),
            Err(err) => warn!(quiz_id = %record.uuid, error = %err, "failed to save quiz"),
        }
    }

    async fn topic_history(&self, topic: &quiz_core::model::Topic) -> TopicHistory {
        let Some(token) = self.auth.token() else {
            return TopicHistory::default();
        };
        match self.api.topic_history(&token, topic).await {
            Ok(history) => history,
            Err(QuizApiError::Unauthorized) => {
                warn!("credential rejected while loading topic history");
                self.auth.invalidate().await;
                TopicHistory::default()
            }
            Err(err) => {
                warn!(error = %err, "failed to load topic history");
                TopicHistory::default()
            }
        }
    }

    /// Scores the attempt and records it remotely.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the attempt is not running or incomplete.
    pub async fn submit(&self, session: &mut QuizSession) -> Result<SubmissionStatus, SessionError> {
        let pending = session.begin_submit()?;
        let status = self.deliver(&pending).await;
        session.finish_submit(&pending, status.clone(), self.policy);
        Ok(status)
    }

    /// Sends a pending submission without touching a session. Used when the
    /// session lives behind a UI signal and must not be held across the await.
    pub async fn deliver(&self, pending: &PendingSubmission) -> SubmissionStatus {
        deliver_result(self.api.as_ref(), &self.auth, &pending.to_submission()).await
    }

    #[must_use]
    pub fn policy(&self) -> SubmitPolicy {
        self.policy
    }

    /// Previous results of the signed-in user, newest first as the backend returns them.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError::Unauthorized` when signed out or when the
    /// credential is rejected (which also forgets it).
    pub async fn list_results(&self) -> Result<Vec<AttemptRecord>, QuizApiError> {
        let Some(token) = self.auth.token() else {
            return Err(QuizApiError::Unauthorized);
        };
        match self.api.list_results(&token).await {
            Err(QuizApiError::Unauthorized) => {
                self.auth.invalidate().await;
                Err(QuizApiError::Unauthorized)
            }
            other => other,
        }
    }
}
