use quiz_core::ValidationError;
use quiz_core::model::{AnswerMap, Question, Score};

use crate::api::SubmittedAnswer;

/// A fixed question set with the answers, cursor and timer layered over it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerSheet {
    questions: Vec<Question>,
    answers: AnswerMap,
    current: usize,
    elapsed_secs: u32,
}

impl AnswerSheet {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            answers: AnswerMap::new(),
            current: 0,
            elapsed_secs: 0,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Records or overwrites the answer for `index`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for an index past the question set or an
    /// option the question does not offer.
    pub fn select(&mut self, index: usize, option: &str) -> Result<(), ValidationError> {
        self.answers.record(&self.questions, index, option)
    }

    /// Moves to the next question; a no-op on the last one.
    pub fn advance(&mut self) {
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        }
    }

    /// Moves to the previous question; a no-op on the first one.
    pub fn retreat(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// # Errors
    ///
    /// Returns `ValidationError::QuestionIndexOutOfRange` for an index past the set.
    pub fn jump_to(&mut self, index: usize) -> Result<(), ValidationError> {
        if index >= self.questions.len() {
            return Err(ValidationError::QuestionIndexOutOfRange {
                index,
                total: self.questions.len(),
            });
        }
        self.current = index;
        Ok(())
    }

    pub fn tick(&mut self) {
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
    }

    /// True when every question has an answer.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answers.covers(self.questions.len())
    }

    /// # Errors
    ///
    /// Returns `ValidationError::IncompleteAnswers` unless every question is answered.
    pub fn ensure_complete(&self) -> Result<(), ValidationError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(ValidationError::IncompleteAnswers {
                answered: self.answers.len(),
                total: self.questions.len(),
            })
        }
    }

    #[must_use]
    pub fn score(&self) -> Score {
        Score::compute(&self.questions, &self.answers)
    }

    /// Per-question answers in question order, as submitted to the backend.
    #[must_use]
    pub fn submitted_answers(&self) -> Vec<SubmittedAnswer> {
        self.answers
            .iter()
            .filter_map(|(index, selected)| {
                let question = self.questions.get(index)?;
                Some(SubmittedAnswer {
                    question_index: index,
                    selected_answer: selected.to_string(),
                    is_correct: question.is_correct(selected),
                })
            })
            .collect()
    }

    /// Clears answers, cursor and timer; keeps the questions as they are.
    pub fn reset(&mut self) {
        self.answers.clear();
        self.current = 0;
        self.elapsed_secs = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<Question> {
        vec![
            Question::new("One?", "A", vec!["A".into(), "B".into()]),
            Question::new("Two?", "C", vec!["B".into(), "C".into()]),
            Question::new("Three?", "D", vec!["D".into(), "E".into()]),
        ]
    }

    #[test]
    fn navigation_is_clamped() {
        let mut sheet = AnswerSheet::new(questions());
        sheet.retreat();
        assert_eq!(sheet.current_index(), 0);
        sheet.advance();
        sheet.advance();
        sheet.advance();
        assert_eq!(sheet.current_index(), 2);
        sheet.jump_to(0).unwrap();
        assert_eq!(sheet.current_index(), 0);
        assert!(sheet.jump_to(3).is_err());
        assert_eq!(sheet.current_index(), 0);
    }

    #[test]
    fn completion_requires_every_index() {
        let mut sheet = AnswerSheet::new(questions());
        sheet.select(0, "A").unwrap();
        sheet.select(2, "E").unwrap();
        assert!(!sheet.is_complete());
        assert_eq!(
            sheet.ensure_complete(),
            Err(ValidationError::IncompleteAnswers {
                answered: 2,
                total: 3
            })
        );
        sheet.select(1, "B").unwrap();
        assert!(sheet.is_complete());
        assert_eq!(sheet.score().correct, 1);
    }

    #[test]
    fn submitted_answers_mark_correctness() {
        let mut sheet = AnswerSheet::new(questions());
        sheet.select(1, "C").unwrap();
        sheet.select(0, "B").unwrap();
        let answers = sheet.submitted_answers();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].question_index, 0);
        assert!(!answers[0].is_correct);
        assert!(answers[1].is_correct);
    }

    #[test]
    fn reset_keeps_questions() {
        let mut sheet = AnswerSheet::new(questions());
        sheet.select(0, "A").unwrap();
        sheet.advance();
        sheet.tick();
        sheet.reset();
        assert_eq!(sheet.total(), 3);
        assert!(sheet.answers().is_empty());
        assert_eq!(sheet.current_index(), 0);
        assert_eq!(sheet.elapsed_secs(), 0);
    }
}
