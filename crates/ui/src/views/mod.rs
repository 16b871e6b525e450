mod home;
mod profile;
mod quiz;
mod scripts;
mod shared;
mod signin;
mod signup;
mod state;

pub use home::HomeView;
pub use profile::ProfileView;
pub use quiz::QuizView;
pub use shared::SharedQuizView;
pub use signin::SignInView;
pub use signup::SignUpView;
pub use state::{ViewError, ViewState, view_state_from_resource};

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
