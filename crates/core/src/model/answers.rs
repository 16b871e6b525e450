use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::Question;

/// Selected option per question index. An absent entry means unanswered.
///
/// Keys always lie in `[0, total)` of the question set the map was recorded against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerMap(BTreeMap<usize, String>);

impl AnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records or overwrites the answer for `index`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::QuestionIndexOutOfRange` when `index` is past the
    /// question set, or `ValidationError::UnknownOption` when `option` is not one
    /// of that question's choices.
    pub fn record(
        &mut self,
        questions: &[Question],
        index: usize,
        option: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let question = questions
            .get(index)
            .ok_or(ValidationError::QuestionIndexOutOfRange {
                index,
                total: questions.len(),
            })?;
        let option = option.into();
        if !question.has_option(&option) {
            return Err(ValidationError::UnknownOption);
        }
        self.0.insert(index, option);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(&index).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every index in `[0, total)` has an answer.
    #[must_use]
    pub fn covers(&self, total: usize) -> bool {
        total > 0 && (0..total).all(|index| self.0.contains_key(&index))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(index, answer)| (*index, answer.as_str()))
    }
}
