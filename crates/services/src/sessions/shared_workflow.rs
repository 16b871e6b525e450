use std::sync::Arc;

use tracing::warn;

use super::machine::{LoadOutcome, PendingSubmission, SubmissionStatus, SubmitPolicy};
use super::shared::SharedQuizSession;
use super::workflow::deliver_result;
use crate::api::QuizApi;
use crate::auth::AuthContext;
use crate::error::SessionError;

/// Drives a [`SharedQuizSession`]: fetch by identifier, then submit.
#[derive(Clone)]
pub struct SharedQuizService {
    api: Arc<dyn QuizApi>,
    auth: AuthContext,
    policy: SubmitPolicy,
}

impl SharedQuizService {
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

    /// Fetches the stored quiz. Also used to retry after a failure.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` if the session cannot load.
    pub async fn load(&self, session: &mut SharedQuizSession) -> Result<LoadOutcome, SessionError> {
        let (ticket, id) = session.begin_loading()?;
        let result = self.api.fetch_quiz(id).await;
        if let Err(err) = &result {
            warn!(quiz_id = %id, error = %err, "failed to fetch shared quiz");
        }
        Ok(session.finish_loading(ticket, result, &mut rand::rng()))
    }

    /// # Errors
    ///
    /// Returns `SessionError` when the attempt is not running or incomplete.
    pub async fn submit(
        &self,
        session: &mut SharedQuizSession,
    ) -> Result<SubmissionStatus, SessionError> {
        let pending = session.begin_submit()?;
        let status = self.deliver(&pending).await;
        session.finish_submit(&pending, status.clone(), self.policy);
        Ok(status)
    }

    pub async fn deliver(&self, pending: &PendingSubmission) -> SubmissionStatus {
        deliver_result(self.api.as_ref(), &self.auth, &pending.to_submission()).await
    }

    #[must_use]
    pub fn policy(&self) -> SubmitPolicy {
        self.policy
    }
}
