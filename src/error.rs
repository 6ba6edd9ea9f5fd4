//! Error types.
//!
//! [`QuizError`] covers every rejected operation of the quiz core. None of
//! them is fatal: the caller shows a message and the session keeps its state.
//! [`AppError`] is what the binary can fail with.

use std::io;

use crate::data::LoadError;

/// A rejected selection or session operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    /// A selection path component does not exist in the repository.
    #[error("not found: {0}")]
    NotFound(String),

    /// The chosen lesson has no questions.
    #[error("lesson has no questions")]
    EmptyQuestionSet,

    /// A choice question was submitted without a selected option.
    #[error("please select an answer")]
    NoSelection,

    /// The selected option index does not exist on the current question.
    #[error("option {0} does not exist")]
    InvalidOption(usize),

    /// A short-answer question was submitted with blank text.
    #[error("please enter an answer")]
    EmptyAnswer,

    /// There is no current question because every question has been passed.
    #[error("session is complete")]
    SessionComplete,

    /// Results were requested before the session completed.
    #[error("session is not complete")]
    NotComplete,

    /// No lesson has been started yet.
    #[error("no session has been started")]
    NotStarted,

    /// The percentage was computed over zero questions.
    #[error("cannot compute a score over zero questions")]
    DivisionByZero,
}

/// Error type for running the program.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Error loading the question bank.
    #[error("failed to load question bank: {0}")]
    Load(#[from] LoadError),

    /// IO error while driving the terminal.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The log subscriber could not be installed.
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}
