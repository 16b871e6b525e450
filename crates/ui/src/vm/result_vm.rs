use services::sessions::{AnswerSheet, QuizOutcome, SubmissionStatus};

use super::time_fmt::format_elapsed;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewItemVm {
    pub number_label: String,
    pub question: String,
    pub selected: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub topic: String,
    pub badge: &'static str,
    pub score_label: String,
    pub percentage_label: String,
    pub feedback: &'static str,
    pub time_label: String,
    pub saved: bool,
    pub submission_note: Option<String>,
    pub review: Vec<ReviewItemVm>,
}

/// Badge and feedback line for a percentage.
#[must_use]
pub fn feedback_for(percentage: f64) -> (&'static str, &'static str) {
    if percentage >= 90.0 {
        ("🌟", "🏆 Excellent! You aced it!")
    } else if percentage >= 70.0 {
        ("💪", "👏 Great job!")
    } else if percentage >= 50.0 {
        ("📘", "🙂 Good try! Keep practicing!")
    } else {
        ("💡", "😅 Don't worry! Try again!")
    }
}

#[must_use]
pub fn map_result(topic: &str, outcome: &QuizOutcome, sheet: &AnswerSheet) -> ResultVm {
    let (badge, feedback) = feedback_for(outcome.score.percentage());
    let (saved, submission_note) = match &outcome.submission {
        SubmissionStatus::Saved => (true, None),
        SubmissionStatus::Skipped => (false, Some("Sign in to save your results.".to_string())),
        SubmissionStatus::Failed(message) => {
            (false, Some(format!("Your result could not be saved: {message}")))
        }
    };
    let review = sheet
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let selected = sheet.answers().get(index).unwrap_or_default();
            ReviewItemVm {
                number_label: format!("Q{}", index + 1),
                question: question.text().to_string(),
                selected: selected.to_string(),
                correct_answer: question.correct_answer().to_string(),
                is_correct: question.is_correct(selected),
            }
        })
        .collect();
    ResultVm {
        topic: topic.to_string(),
        badge,
        score_label: format!("{} / {}", outcome.score.correct, outcome.score.total),
        percentage_label: outcome.score.percentage_label(),
        feedback,
        time_label: format!("Time: {}", format_elapsed(outcome.elapsed_secs)),
        saved,
        submission_note,
        review,
    }
}
