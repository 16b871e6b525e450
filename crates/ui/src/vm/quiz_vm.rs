use quiz_core::model::{AnswerMap, Question, TopicHistory};
use services::sessions::{AnswerSheet, SessionProgress};

use super::history_vm::{AttemptRowVm, map_attempt_rows};
use super::time_fmt::format_elapsed;

/// User actions on a quiz attempt, shared by the generated and shared quiz views.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Start,
    Select { index: usize, option: String },
    Next,
    Previous,
    Jump(usize),
    Submit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub label: String,
    pub selected: bool,
    /// Only revealed in the preview.
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub index: usize,
    pub number_label: String,
    pub text: String,
    pub options: Vec<OptionVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewVm {
    pub topic: String,
    pub total_label: String,
    pub questions: Vec<QuestionVm>,
    pub previous_attempts: Vec<AttemptRowVm>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DotVm {
    pub index: usize,
    pub answered: bool,
    pub current: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptVm {
    pub current: Option<QuestionVm>,
    pub progress_label: String,
    pub answered_label: String,
    pub timer_label: String,
    pub dots: Vec<DotVm>,
    pub is_first: bool,
    pub is_last: bool,
    pub can_submit: bool,
    pub submitting: bool,
}

fn map_question(index: usize, question: &Question, answers: Option<&AnswerMap>, reveal: bool) -> QuestionVm {
    let selected = answers.and_then(|answers| answers.get(index));
    QuestionVm {
        index,
        number_label: format!("Question {}", index + 1),
        text: question.text().to_string(),
        options: question
            .options()
            .iter()
            .map(|option| OptionVm {
                label: option.clone(),
                selected: selected == Some(option.as_str()),
                is_correct: reveal && question.is_correct(option),
            })
            .collect(),
    }
}

#[must_use]
pub fn map_preview(topic: &str, questions: &[Question], history: &TopicHistory) -> PreviewVm {
    let previous_attempts = if history.has_previous_attempts {
        map_attempt_rows(&history.previous_quizzes)
    } else {
        Vec::new()
    };
    PreviewVm {
        topic: topic.to_string(),
        total_label: format!("Total Questions: {}", questions.len()),
        questions: questions
            .iter()
            .enumerate()
            .map(|(index, question)| map_question(index, question, None, true))
            .collect(),
        previous_attempts,
    }
}

#[must_use]
pub fn map_attempt(sheet: &AnswerSheet, progress: SessionProgress, can_submit: bool) -> AttemptVm {
    let current_index = sheet.current_index();
    AttemptVm {
        current: sheet
            .current_question()
            .map(|question| map_question(current_index, question, Some(sheet.answers()), false)),
        progress_label: format!("Question {} of {}", current_index + 1, progress.total),
        answered_label: format!("{} / {} answered", progress.answered, progress.total),
        timer_label: format!("Time: {}", format_elapsed(progress.elapsed_secs)),
        dots: (0..progress.total)
            .map(|index| DotVm {
                index,
                answered: sheet.answers().get(index).is_some(),
                current: index == current_index,
            })
            .collect(),
        is_first: current_index == 0,
        is_last: current_index + 1 >= progress.total,
        can_submit,
        submitting: progress.submitting,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::AttemptRecord;

    fn sheet() -> AnswerSheet {
        AnswerSheet::new(vec![
            Question::new("One?", "A", vec!["A".into(), "B".into()]),
            Question::new("Two?", "B", vec!["A".into(), "B".into()]),
        ])
    }

    fn progress(sheet: &AnswerSheet) -> SessionProgress {
        SessionProgress {
            total: sheet.total(),
            answered: sheet.answers().len(),
            current_index: sheet.current_index(),
            elapsed_secs: sheet.elapsed_secs(),
            started: true,
            submitting: false,
            is_complete: sheet.is_complete(),
        }
    }

    #[test]
    fn preview_marks_correct_answers() {
        let sheet = sheet();
        let vm = map_preview("Biology", sheet.questions(), &TopicHistory::default());
        assert_eq!(vm.total_label, "Total Questions: 2");
        assert!(vm.questions[0].options[0].is_correct);
        assert!(!vm.questions[0].options[1].is_correct);
        assert!(vm.previous_attempts.is_empty());
    }

    #[test]
    fn preview_lists_previous_attempts() {
        let history = TopicHistory {
            has_previous_attempts: true,
            previous_quizzes: vec![AttemptRecord {
                topic: "Biology".into(),
                score: 1,
                total_questions: 2,
                time_spent: None,
                created_at: None,
            }],
        };
        let vm = map_preview("Biology", sheet().questions(), &history);
        assert_eq!(vm.previous_attempts[0].percentage_label, "50.0%");
    }

    #[test]
    fn attempt_hides_answers_and_tracks_selection() {
        let mut sheet = sheet();
        sheet.select(0, "B").unwrap();
        for _ in 0..5 {
            sheet.tick();
        }
        let vm = map_attempt(&sheet, progress(&sheet), false);
        let current = vm.current.unwrap();
        assert!(current.options.iter().all(|option| !option.is_correct));
        assert!(current.options[1].selected);
        assert_eq!(vm.timer_label, "Time: 0:05");
        assert_eq!(vm.progress_label, "Question 1 of 2");
        assert_eq!(vm.answered_label, "1 / 2 answered");
        assert!(vm.dots[0].answered && vm.dots[0].current);
        assert!(vm.is_first && !vm.is_last);
    }
}
