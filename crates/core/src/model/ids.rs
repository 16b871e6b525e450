use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Client-generated identifier of a quiz session.
///
/// 128 random bits, string-encoded as a hyphenated UUID. It is the join key
/// with the backend's persisted copy and the path segment of share links.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizId(Uuid);

impl QuizId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Debug for QuizId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuizId({})", self.0)
    }
}

impl fmt::Display for QuizId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Error type for parsing a `QuizId` from a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseQuizIdError {
    raw: String,
}

impl fmt::Display for ParseQuizIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid quiz id: {}", self.raw)
    }
}

impl std::error::Error for ParseQuizIdError {}

impl FromStr for QuizId {
    type Err = ParseQuizIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| ParseQuizIdError { raw: s.to_string() })
    }
}
