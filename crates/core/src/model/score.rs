use serde::{Deserialize, Serialize};

use crate::model::{AnswerMap, Question};

/// Number of correct answers out of the question count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub correct: u32,
    pub total: u32,
}

impl Score {
    #[must_use]
    pub fn new(correct: u32, total: u32) -> Self {
        Self { correct, total }
    }

    /// Counts answers whose text equals the question's correct answer.
    #[must_use]
    pub fn compute(questions: &[Question], answers: &AnswerMap) -> Self {
        let correct = questions
            .iter()
            .enumerate()
            .filter(|(index, question)| {
                answers
                    .get(*index)
                    .is_some_and(|answer| question.is_correct(answer))
            })
            .count();
        Self {
            correct: u32::try_from(correct).unwrap_or(u32::MAX),
            total: u32::try_from(questions.len()).unwrap_or(u32::MAX),
        }
    }

    /// `100 * correct / total`; zero when there are no questions.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        100.0 * f64::from(self.correct) / f64::from(self.total)
    }

    /// One-decimal display, e.g. `75.0%`.
    #[must_use]
    pub fn percentage_label(&self) -> String {
        format!("{:.1}%", self.percentage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_matching_answers() {
        let questions = vec![
            Question::new("q1", "A", vec!["A".into(), "B".into()]),
            Question::new("q2", "C", vec!["B".into(), "C".into()]),
        ];
        let mut answers = AnswerMap::new();
        answers.record(&questions, 0, "A").unwrap();
        answers.record(&questions, 1, "B").unwrap();
        assert_eq!(Score::compute(&questions, &answers), Score::new(1, 2));
    }

    #[test]
    fn percentage_label_has_one_decimal() {
        assert_eq!(Score::new(3, 4).percentage_label(), "75.0%");
        assert_eq!(Score::new(1, 3).percentage_label(), "33.3%");
        assert_eq!(Score::new(0, 0).percentage_label(), "0.0%");
    }
}
