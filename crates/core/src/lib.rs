#![forbid(unsafe_code)]

pub mod error;
pub mod export;
pub mod model;
pub mod password;
pub mod share;
pub mod shuffle;
pub mod time;

pub use error::ValidationError;
pub use time::Clock;
