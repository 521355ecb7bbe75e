use std::path::PathBuf;
use thiserror::Error;

use crate::round::Phase;

/// Problems with the question file. Any of these rejects the whole bank.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read question file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("question file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("question file must contain a list of questions")]
    NotASequence,

    #[error("record {index}: expected an object with question fields")]
    RecordNotAnObject { index: usize },

    #[error("record {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("record {index}: question text must not be empty")]
    EmptyQuestion { index: usize },

    #[error("record {index}: answers must contain exactly 4 entries (found {found})")]
    WrongAnswerCount { index: usize, found: usize },

    #[error("record {index}: answers must be distinct")]
    DuplicateAnswer { index: usize },

    #[error("record {index}: correct index {correct} is outside 0..=3")]
    CorrectOutOfRange { index: usize, correct: i64 },

    #[error("record {index}: difficulty must be at least 1")]
    InvalidDifficulty { index: usize },

    #[error("not enough questions: found {found}, need at least {required}")]
    InsufficientQuestions { found: usize, required: usize },
}

/// Session parameters the bank or the rules cannot satisfy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("a session needs at least one question")]
    NoQuestionsRequested,

    #[error("seconds per question must be at least 1")]
    NoTimeBudget,

    #[error("requested {requested} questions but the bank only holds {available}")]
    BankTooSmall { requested: usize, available: usize },

    #[error("question bank exhausted after {played} of {requested} questions")]
    BankExhausted { played: usize, requested: usize },
}

/// An event arrived that the current state cannot accept. Callers log and drop it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IllegalEventError {
    #[error("no session is active")]
    SessionInactive,

    #[error("{event} is not accepted while {phase}")]
    WrongPhase { event: &'static str, phase: Phase },

    #[error("the answer is already locked")]
    AnswerLocked,

    #[error("a hint was already used for this question")]
    HintAlreadyUsed,

    #[error("answer {index} is not a selectable option")]
    InvalidAnswer { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_questions_names_the_count() {
        let err = LoadError::InsufficientQuestions {
            found: 4,
            required: 5,
        };
        assert_eq!(
            err.to_string(),
            "not enough questions: found 4, need at least 5"
        );
    }

    #[test]
    fn record_errors_carry_their_index() {
        let err = LoadError::WrongAnswerCount { index: 2, found: 3 };
        assert!(err.to_string().starts_with("record 2:"));
    }

    #[test]
    fn wrong_phase_mentions_event() {
        let err = IllegalEventError::WrongPhase {
            event: "advance",
            phase: Phase::AwaitingAnswer,
        };
        assert_eq!(
            err.to_string(),
            "advance is not accepted while AwaitingAnswer"
        );
    }
}
