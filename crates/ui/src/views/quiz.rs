mod components;
mod screen;
mod view;

pub(crate) use components::{
    AttemptPanel, ExitDialog, FailedPanel, LoadingPanel, PreviewPanel, QuizScreen, ResultPanel,
};
pub(crate) use screen::shared_screen;
pub use view::QuizView;
pub(crate) use view::SHARE_COPIED;
#[cfg(test)]
pub(crate) use view::QuizTestHandles;
