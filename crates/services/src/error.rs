//! Shared error types for the services crate.

use thiserror::Error;

use mutranier_core::model::{QuestionError, QuizSettingsError, RoundSummaryError};

/// Errors emitted by `RoundState` transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundError {
    #[error("a round needs at least one question")]
    Empty,
    #[error("{input:?} is not a note; use C, C#, D, ... B or a flat like Bb")]
    InvalidNote { input: String },
    #[error("current question is already answered; advance first")]
    AwaitingAdvance,
    #[error("current question has not been answered yet")]
    AwaitingAnswer,
    #[error("round already finished")]
    Finished,
    #[error(transparent)]
    Question(#[from] QuestionError),
}

/// Errors emitted by quiz sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("round is not finished yet")]
    Incomplete,
    #[error(transparent)]
    Round(#[from] RoundError),
    #[error(transparent)]
    Settings(#[from] QuizSettingsError),
    #[error(transparent)]
    Summary(#[from] RoundSummaryError),
}
