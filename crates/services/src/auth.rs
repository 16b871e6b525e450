use std::sync::{Arc, RwLock};

use quiz_core::Clock;
use quiz_core::model::AuthToken;
use storage::repository::{CredentialRepository, StorageError, StoredCredential};
use tracing::{debug, warn};

/// The current sign-in credential, shared by everything that talks to the backend.
///
/// Cloning is cheap; clones observe the same credential.
#[derive(Clone)]
pub struct AuthContext {
    credentials: Arc<dyn CredentialRepository>,
    current: Arc<RwLock<Option<AuthToken>>>,
    clock: Clock,
}

impl AuthContext {
    /// A signed-out context backed by `credentials`.
    #[must_use]
    pub fn new(credentials: Arc<dyn CredentialRepository>, clock: Clock) -> Self {
        Self {
            credentials,
            current: Arc::new(RwLock::new(None)),
            clock,
        }
    }

    /// Restores the credential persisted by a previous run.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the repository cannot be read.
    pub async fn load(
        credentials: Arc<dyn CredentialRepository>,
        clock: Clock,
    ) -> Result<Self, StorageError> {
        let stored = credentials.load_credential().await?;
        let context = Self::new(credentials, clock);
        if let Some(stored) = stored {
            debug!(saved_at = %stored.saved_at, "restored credential");
            context.set(Some(stored.token));
        }
        Ok(context)
    }

    #[must_use]
    pub fn token(&self) -> Option<AuthToken> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Stores `token` locally and makes it current.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the credential cannot be persisted; the
    /// in-memory credential is left unchanged in that case.
    pub async fn establish(&self, token: AuthToken) -> Result<(), StorageError> {
        let credential = StoredCredential {
            token: token.clone(),
            saved_at: self.clock.now(),
        };
        self.credentials.save_credential(&credential).await?;
        self.set(Some(token));
        debug!("credential established");
        Ok(())
    }

    /// Forgets the credential, in memory and in storage.
    ///
    /// The in-memory credential is always cleared; a storage failure is only logged.
    pub async fn invalidate(&self) {
        self.set(None);
        if let Err(err) = self.credentials.clear_credential().await {
            warn!(error = %err, "failed to clear stored credential");
        }
    }

    fn set(&self, token: Option<AuthToken>) {
        match self.current.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }
}
