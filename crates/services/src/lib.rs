#![forbid(unsafe_code)]

pub mod error;
pub mod progress_tracker;
pub mod quiz_service;
pub mod sample;
pub mod sessions;

pub use quiz_core::Clock;

pub use error::{QuizError, SessionError};
pub use progress_tracker::{TitleStatus, record_run};
pub use quiz_service::{QuizService, UploadReport};
pub use sessions::{
    AnswerRecord, AnswerSlot, Direction, RunMode, RunSummary, SessionProgress, SessionService,
    SubmitOutcome,
};
