mod exit_guard;
mod machine;
mod progress;
mod shared;
mod shared_workflow;
mod sheet;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use exit_guard::{ExitDecision, ExitGuard};
pub use machine::{
    LoadOutcome, LoadTicket, PendingSubmission, QuizOutcome, QuizSession, SessionPhase,
    SubmissionStatus, SubmitPolicy, SubmitTicket,
};
pub use progress::SessionProgress;
pub use shared::{INVALID_LINK_MESSAGE, SharedQuizSession};
pub use shared_workflow::SharedQuizService;
pub use sheet::AnswerSheet;
pub use workflow::QuizSessionService;
