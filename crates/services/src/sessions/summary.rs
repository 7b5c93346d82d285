use quiz_core::model::accuracy;

use super::service::RunMode;

/// Results of a single run, computed from that run's answers only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub mode: RunMode,
    pub total_questions: usize,
    pub answered: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub revealed: usize,
    /// Correct answers over all questions in the run, in whole percent.
    pub accuracy: u8,
}

impl RunSummary {
    pub(crate) fn new(
        mode: RunMode,
        total_questions: usize,
        correct: usize,
        incorrect: usize,
        revealed: usize,
    ) -> Self {
        Self {
            mode,
            total_questions,
            answered: correct + incorrect,
            correct,
            incorrect,
            revealed,
            accuracy: accuracy(correct as u64, total_questions as u64),
        }
    }

    /// Questions without a judged answer, revealed ones included.
    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.total_questions.saturating_sub(self.answered)
    }
}
