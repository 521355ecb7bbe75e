// Library surface: the headless quiz core plus the event runtime.
// Terminal rendering lives in the binary.
pub mod app_dirs;
pub mod bank;
pub mod config;
pub mod error;
pub mod round;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod timer;

pub use bank::{Question, QuestionBank};
pub use error::{ConfigurationError, IllegalEventError, LoadError};
pub use session::{QuizEvent, SessionController, SessionSettings, SessionSummary};
