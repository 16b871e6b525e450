mod answers;
mod history;
mod ids;
mod question;
mod score;
mod token;
mod topic;

pub use answers::AnswerMap;
pub use history::{AttemptRecord, ProfileStats, TopicHistory, UserProfile};
pub use ids::{ParseQuizIdError, QuizId};
pub use question::{
    NO_CORRECT_ANSWER, NO_OPTIONS, NO_QUESTION, Question, QuestionPayload, RawQuestion,
};
pub use score::Score;
pub use token::AuthToken;
pub use topic::{PRESET_TOPICS, Topic};
