use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::AuthToken;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted bearer credential with the moment it was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    pub token: AuthToken,
    pub saved_at: DateTime<Utc>,
}

/// Client-local persistence of the sign-in credential.
///
/// At most one credential is stored; saving replaces it.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Load the stored credential, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    async fn load_credential(&self) -> Result<Option<StoredCredential>, StorageError>;

    /// Store or replace the credential.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the credential cannot be written.
    async fn save_credential(&self, credential: &StoredCredential) -> Result<(), StorageError>;

    /// Remove the stored credential. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    async fn clear_credential(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    credential: Arc<Mutex<Option<StoredCredential>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialRepository for InMemoryRepository {
    async fn load_credential(&self) -> Result<Option<StoredCredential>, StorageError> {
        let guard = self
            .credential
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_credential(&self, credential: &StoredCredential) -> Result<(), StorageError> {
        let mut guard = self
            .credential
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(credential.clone());
        Ok(())
    }

    async fn clear_credential(&self) -> Result<(), StorageError> {
        let mut guard = self
            .credential
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub credentials: Arc<dyn CredentialRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let credentials: Arc<dyn CredentialRepository> = Arc::new(InMemoryRepository::new());
        Self { credentials }
    }
}
