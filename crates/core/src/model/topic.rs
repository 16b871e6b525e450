use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Topics offered by the home picker. Any other non-blank text is accepted too.
pub const PRESET_TOPICS: [&str; 10] = [
    "Artificial Intelligence",
    "Web Development",
    "Data Science",
    "Cybersecurity",
    "Cloud Computing",
    "Machine Learning",
    "Biology",
    "Astronomy",
    "Mathematics",
    "General Knowledge",
];

/// Free-form quiz topic, trimmed and guaranteed non-empty.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic(String);

impl Topic {
    /// Trims and validates a topic.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyTopic` for blank or whitespace-only input.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTopic);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Topic {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Topic> for String {
    fn from(value: Topic) -> Self {
        value.0
    }
}

impl fmt::Debug for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Topic({:?})", self.0)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
