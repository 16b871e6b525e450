use std::sync::Arc;

use tracing::warn;

use quiz_core::model::{AttemptRecord, ProfileStats, UserProfile};

use crate::api::AccountApi;
use crate::auth::AuthContext;
use crate::error::{AccountError, QuizApiError};

/// Profile page data: the user, their attempts and stats derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileOverview {
    pub user: UserProfile,
    pub history: Vec<AttemptRecord>,
    pub stats: ProfileStats,
}

#[derive(Clone)]
pub struct ProfileService {
    api: Arc<dyn AccountApi>,
    auth: AuthContext,
}

impl ProfileService {
    #[must_use]
    pub fn new(api: Arc<dyn AccountApi>, auth: AuthContext) -> Self {
        Self { api, auth }
    }

    /// # Errors
    ///
    /// Returns `AccountError::SignedOut` without a credential. A rejected
    /// credential is forgotten and reported as `AccountError::Api(Unauthorized)`.
    pub async fn load(&self) -> Result<ProfileOverview, AccountError> {
        let token = self.auth.token().ok_or(AccountError::SignedOut)?;
        let response = match self.api.profile(&token).await {
            Ok(response) => response,
            Err(QuizApiError::Unauthorized) => {
                warn!("credential rejected while loading profile");
                self.auth.invalidate().await;
                return Err(QuizApiError::Unauthorized.into());
            }
            Err(err) => return Err(err.into()),
        };
        let stats = ProfileStats::from_history(&response.quiz_history);
        Ok(ProfileOverview {
            user: response.user,
            history: response.quiz_history,
            stats,
        })
    }
}
