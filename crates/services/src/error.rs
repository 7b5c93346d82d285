//! Shared error types for the services crate.
//!
//! Every variant is a recoverable validation failure: the operation that
//! returned it left the application state unchanged.

use thiserror::Error;

use quiz_core::model::{AppStateError, BankError, BankId, OptionId, ProgressError};

/// Errors emitted by the session state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no question bank selected")]
    NoBankSelected,
    #[error("no missed questions to review")]
    NoMissedQuestions,
    #[error("select at least one option")]
    EmptySelection,
    #[error("option {0} is not offered by this question")]
    UnknownOption(OptionId),
    #[error("question already checked")]
    AlreadyChecked,
    #[error("run already finished")]
    Finished,
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("only .txt question banks are supported (got {0:?})")]
    InvalidFileType(String),
    #[error("could not parse any questions from {0:?}")]
    UnparseableBank(String),
    #[error("bank {0} not found")]
    BankNotFound(BankId),
    #[error("invalid selection {0:?}; use option letters such as A or AC")]
    InvalidSelection(String),
    #[error("no run in progress")]
    NoActiveRun,
    #[error("this run has no wrong answers")]
    NoRunErrors,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    AppState(#[from] AppStateError),
}
