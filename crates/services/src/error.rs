//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::ValidationError;
use storage::repository::StorageError;

use crate::sessions::SessionPhase;

/// Shown when generation fails without a message of its own.
pub const GENERATION_FALLBACK: &str = "Failed to generate questions. Please try again.";
/// Shown when a shared quiz cannot be found.
pub const NOT_FOUND_MESSAGE: &str = "Quiz not found. The link may be invalid or the quiz has expired.";

/// Errors emitted by the backend clients.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizApiError {
    #[error("question generation failed: {0}")]
    Generation(String),
    #[error("quiz not found")]
    NotFound,
    #[error("persistence failed: {0}")]
    Persistence(String),
    #[error("credential missing or expired")]
    Unauthorized,
    #[error("backend returned {status}")]
    Backend {
        status: reqwest::StatusCode,
        message: Option<String>,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl QuizApiError {
    /// Message suitable for display in an error state.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Generation(message) if !message.trim().is_empty() => message.clone(),
            Self::Generation(_) => GENERATION_FALLBACK.to_string(),
            Self::NotFound => NOT_FOUND_MESSAGE.to_string(),
            Self::Persistence(message) => message.clone(),
            Self::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            Self::Backend {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Backend { status, .. } => format!("Request failed ({status})."),
            Self::Http(_) => "Could not reach the server. Check your connection.".to_string(),
        }
    }
}

/// Errors emitted by the session state machines.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("cannot {action} while {phase:?}")]
    InvalidTransition {
        phase: SessionPhase,
        action: &'static str,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors emitted by account and profile services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AccountError {
    #[error("not signed in")]
    SignedOut,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] QuizApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AccountError {
    /// True when the caller should send the user to sign-in.
    #[must_use]
    pub fn requires_sign_in(&self) -> bool {
        matches!(self, Self::SignedOut | Self::Api(QuizApiError::Unauthorized))
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::SignedOut => "Please sign in to continue.".to_string(),
            Self::Validation(err) => err.to_string(),
            Self::Api(err) => err.user_message(),
            Self::Storage(_) => "Could not access local storage.".to_string(),
        }
    }
}
