mod history_vm;
mod profile_vm;
mod quiz_vm;
mod result_vm;
mod time_fmt;

pub use history_vm::{AttemptRowVm, map_attempt_rows};
pub use profile_vm::{ProfileVm, map_profile};
pub use quiz_vm::{
    AttemptVm, DotVm, OptionVm, PreviewVm, QuestionVm, QuizIntent, map_attempt, map_preview,
};
pub use result_vm::{ResultVm, ReviewItemVm, feedback_for, map_result};
pub use time_fmt::{format_datetime, format_elapsed};
