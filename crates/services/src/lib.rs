#![forbid(unsafe_code)]

pub mod account_service;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod profile_service;
pub mod sessions;

pub use quiz_core::Clock;

pub use account_service::AccountService;
pub use api::{AccountApi, HttpBackend, QuizApi};
pub use auth::AuthContext;
pub use config::{BackendConfig, ConfigError};
pub use error::{AccountError, QuizApiError, SessionError};
pub use profile_service::{ProfileOverview, ProfileService};
pub use sessions::{
    ExitDecision, ExitGuard, LoadOutcome, QuizSession, QuizSessionService, SessionPhase,
    SharedQuizService, SharedQuizSession, SubmissionStatus, SubmitPolicy,
};
