use services::ProfileOverview;

use super::history_vm::{AttemptRowVm, map_attempt_rows};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileVm {
    pub name: String,
    pub email: String,
    pub initial: String,
    pub total_quizzes: String,
    pub average_score: String,
    pub highest_score: String,
    pub correct_label: String,
    pub history: Vec<AttemptRowVm>,
}

#[must_use]
pub fn map_profile(overview: &ProfileOverview) -> ProfileVm {
    let stats = overview.stats;
    ProfileVm {
        name: overview.user.name.clone(),
        email: overview.user.email.clone(),
        initial: overview
            .user
            .name
            .chars()
            .next()
            .map(|ch| ch.to_uppercase().to_string())
            .unwrap_or_default(),
        total_quizzes: stats.total_quizzes.to_string(),
        average_score: format!("{:.1}%", stats.average_score),
        highest_score: format!("{:.1}%", stats.highest_score),
        correct_label: format!("{} / {}", stats.total_correct, stats.total_questions),
        history: map_attempt_rows(&overview.history),
    }
}
