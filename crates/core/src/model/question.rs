use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::shuffle::shuffle_with;

pub const NO_QUESTION: &str = "No question available";
pub const NO_CORRECT_ANSWER: &str = "No correct answer";
pub const NO_OPTIONS: &str = "No options available";

/// Question as produced by the generator or returned for a stored quiz.
///
/// Every field is optional on the wire; `Question::from_raw` fills the gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuestion {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default, alias = "answer", alias = "correctAnswer")]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
}

/// Accepted shapes of a generation response: a bare array or `{ data: { questions } }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum QuestionPayload {
    List(Vec<RawQuestion>),
    Wrapped { data: WrappedQuestions },
}

#[derive(Debug, Clone, Deserialize)]
pub struct WrappedQuestions {
    #[serde(default)]
    pub questions: Vec<RawQuestion>,
}

impl QuestionPayload {
    #[must_use]
    pub fn into_questions(self) -> Vec<RawQuestion> {
        match self {
            Self::List(questions) => questions,
            Self::Wrapped { data } => data.questions,
        }
    }
}

/// A multiple-choice question ready for display.
///
/// Invariant: `correct_answer` is always one of `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    text: String,
    correct_answer: String,
    options: Vec<String>,
}

impl Question {
    /// Builds a question, appending the correct answer to the options when absent.
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        correct_answer: impl Into<String>,
        options: Vec<String>,
    ) -> Self {
        let correct_answer = correct_answer.into();
        let mut options = options;
        if !options.iter().any(|option| *option == correct_answer) {
            options.push(correct_answer.clone());
        }
        Self {
            text: text.into(),
            correct_answer,
            options,
        }
    }

    /// Normalizes a wire question, substituting placeholders for missing fields.
    #[must_use]
    pub fn from_raw(raw: RawQuestion) -> Self {
        let text = non_blank(raw.question).unwrap_or_else(|| NO_QUESTION.to_string());
        let correct = non_blank(raw.correct_answer).unwrap_or_else(|| NO_CORRECT_ANSWER.to_string());
        let options = raw
            .options
            .filter(|options| !options.is_empty())
            .unwrap_or_else(|| vec![NO_OPTIONS.to_string()]);
        Self::new(text, correct, options)
    }

    /// Returns a copy with the option order permuted.
    #[must_use]
    pub fn shuffled_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        Self {
            text: self.text.clone(),
            correct_answer: self.correct_answer.clone(),
            options: shuffle_with(&self.options, rng),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|candidate| candidate == option)
    }

    /// Answers are compared by string, never by position.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn raw(question: &str, answer: &str, options: &[&str]) -> RawQuestion {
        RawQuestion {
            question: Some(question.to_string()),
            correct_answer: Some(answer.to_string()),
            options: Some(options.iter().map(ToString::to_string).collect()),
        }
    }

    #[test]
    fn missing_fields_become_placeholders() {
        let question = Question::from_raw(RawQuestion::default());
        assert_eq!(question.text(), NO_QUESTION);
        assert_eq!(question.correct_answer(), NO_CORRECT_ANSWER);
        assert_eq!(question.options()[0], NO_OPTIONS);
        assert!(question.has_option(question.correct_answer()));
    }

    #[test]
    fn correct_answer_stays_a_member_after_shuffle() {
        let mut rng = StdRng::seed_from_u64(3);
        let question = Question::from_raw(raw("2+2?", "4", &["3", "4", "5", "22"]));
        for _ in 0..20 {
            let shuffled = question.shuffled_with(&mut rng);
            assert!(shuffled.has_option(shuffled.correct_answer()));
            assert_eq!(shuffled.options().len(), 4);
        }
    }

    #[test]
    fn correct_answer_missing_from_options_is_appended() {
        let question = Question::from_raw(raw("Capital of France?", "Paris", &["Rome", "Madrid"]));
        assert_eq!(question.options(), ["Rome", "Madrid", "Paris"]);
    }

    #[test]
    fn payload_accepts_array_and_wrapped_shapes() {
        let list: QuestionPayload =
            serde_json::from_str(r#"[{"question":"q","answer":"a","options":["a","b"]}]"#).unwrap();
        let list = list.into_questions();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].correct_answer.as_deref(), Some("a"));

        let wrapped: QuestionPayload = serde_json::from_str(
            r#"{"data":{"questions":[{"question":"q","correct_answer":"b","options":["a","b"]}]}}"#,
        )
        .unwrap();
        assert_eq!(wrapped.into_questions()[0].correct_answer.as_deref(), Some("b"));
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let question = Question::new("q", "a", vec!["a".into(), "b".into()]);
        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(json["question"], "q");
        assert_eq!(json["correct_answer"], "a");
    }
}
