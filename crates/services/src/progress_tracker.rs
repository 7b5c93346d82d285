//! Lifetime accuracy accounting and title lookup.

use quiz_core::model::{ProgressError, ProgressState};
use quiz_core::titles::{self, NextTitle, TitleTier};
use tracing::debug;

/// Adds a finished batch of answers to the lifetime counters.
///
/// Review runs are ignored so re-answering the missed set cannot inflate
/// accuracy.
///
/// # Errors
///
/// Returns `ProgressError::CorrectExceedsTotal` if `correct > total`; counters are untouched.
pub fn record_run(
    progress: &mut ProgressState,
    correct: u64,
    total: u64,
    is_review: bool,
) -> Result<(), ProgressError> {
    if is_review {
        debug!(correct, total, "review run not counted toward progress");
        return Ok(());
    }
    progress.add(correct, total)?;
    debug!(
        correct_count = progress.correct_count(),
        total_answered = progress.total_answered(),
        "progress updated"
    );
    Ok(())
}

#[must_use]
pub fn current_title(accuracy: u8) -> Option<&'static TitleTier> {
    titles::current_title(accuracy)
}

#[must_use]
pub fn next_title(accuracy: u8) -> NextTitle {
    titles::next_title(accuracy)
}

/// Snapshot of where the user stands, ready for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleStatus {
    pub accuracy: u8,
    pub current: Option<&'static TitleTier>,
    pub next: NextTitle,
}

impl TitleStatus {
    #[must_use]
    pub fn from_progress(progress: &ProgressState) -> Self {
        let accuracy = progress.accuracy();
        Self {
            accuracy,
            current: current_title(accuracy),
            next: next_title(accuracy),
        }
    }
}
