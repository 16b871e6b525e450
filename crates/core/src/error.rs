use thiserror::Error;

use crate::password::PasswordError;

/// Local, synchronous validation failures. None of these reach the backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("No topic provided. Please go back and select a topic.")]
    EmptyTopic,

    #[error("answer every question before submitting ({answered}/{total} answered)")]
    IncompleteAnswers { answered: usize, total: usize },

    #[error("question index {index} is out of range for {total} questions")]
    QuestionIndexOutOfRange { index: usize, total: usize },

    #[error("option is not one of the question's choices")]
    UnknownOption,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error(transparent)]
    Password(#[from] PasswordError),
}
