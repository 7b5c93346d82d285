mod progress;
mod record;
mod service;
mod summary;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use record::{AnswerRecord, AnswerSlot};
pub use service::{Direction, RunMode, SessionService, SubmitOutcome};
pub use summary::RunSummary;
