use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("correct count {correct} exceeds total {total}")]
    CorrectExceedsTotal { correct: u64, total: u64 },
}

/// Lifetime answer counters. Both fields only ever grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressState {
    correct_count: u64,
    total_answered: u64,
}

impl ProgressState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds counters from storage.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::CorrectExceedsTotal` if `correct_count > total_answered`.
    pub fn from_counts(correct_count: u64, total_answered: u64) -> Result<Self, ProgressError> {
        if correct_count > total_answered {
            return Err(ProgressError::CorrectExceedsTotal {
                correct: correct_count,
                total: total_answered,
            });
        }
        Ok(Self {
            correct_count,
            total_answered,
        })
    }

    #[must_use]
    pub fn correct_count(&self) -> u64 {
        self.correct_count
    }

    #[must_use]
    pub fn total_answered(&self) -> u64 {
        self.total_answered
    }

    /// Adds a batch of attempts.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::CorrectExceedsTotal` if `correct > total`; counters are untouched.
    pub fn add(&mut self, correct: u64, total: u64) -> Result<(), ProgressError> {
        if correct > total {
            return Err(ProgressError::CorrectExceedsTotal { correct, total });
        }
        self.correct_count = self.correct_count.saturating_add(correct);
        self.total_answered = self.total_answered.saturating_add(total);
        Ok(())
    }

    /// Lifetime accuracy in whole percent.
    #[must_use]
    pub fn accuracy(&self) -> u8 {
        accuracy(self.correct_count, self.total_answered)
    }
}

/// `round(correct / total * 100)`, rounding halves up; 0 when `total == 0`.
#[must_use]
pub fn accuracy(correct: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = u128::from(correct.min(total));
    let total = u128::from(total);
    let pct = (correct * 200 + total) / (total * 2);
    u8::try_from(pct).unwrap_or(100)
}
