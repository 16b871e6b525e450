use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed attempt as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    #[serde(default)]
    pub topic: String,
    pub score: u32,
    pub total_questions: u32,
    #[serde(default)]
    pub time_spent: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl AttemptRecord {
    /// Percentage for this attempt; zero when the record has no questions.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        100.0 * f64::from(self.score) / f64::from(self.total_questions)
    }
}

/// Previous attempts of the signed-in user for one topic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicHistory {
    #[serde(default)]
    pub has_previous_attempts: bool,
    #[serde(default)]
    pub previous_quizzes: Vec<AttemptRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Aggregates shown on the profile page.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProfileStats {
    pub total_quizzes: usize,
    pub total_correct: u64,
    pub total_questions: u64,
    /// `100 * total_correct / total_questions`, weighting every question equally.
    pub average_score: f64,
    /// Best single-attempt percentage.
    pub highest_score: f64,
}

impl ProfileStats {
    #[must_use]
    pub fn from_history(history: &[AttemptRecord]) -> Self {
        if history.is_empty() {
            return Self::default();
        }

        let total_correct: u64 = history.iter().map(|item| u64::from(item.score)).sum();
        let total_questions: u64 = history
            .iter()
            .map(|item| u64::from(item.total_questions))
            .sum();
        let highest_score = history
            .iter()
            .map(AttemptRecord::percentage)
            .fold(0.0_f64, f64::max);
        #[allow(clippy::cast_precision_loss)]
        let average_score = if total_questions == 0 {
            0.0
        } else {
            100.0 * total_correct as f64 / total_questions as f64
        };

        Self {
            total_quizzes: history.len(),
            total_correct,
            total_questions,
            average_score,
            highest_score,
        }
    }
}
