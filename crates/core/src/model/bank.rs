use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::BankId;
use crate::model::question::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("bank name cannot be empty")]
    EmptyName,

    #[error("bank must contain at least one question")]
    Empty,
}

//
// ─── BANK ──────────────────────────────────────────────────────────────────────
//

/// A named, ordered collection of questions uploaded by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    id: BankId,
    name: String,
    questions: Vec<Question>,
    last_used: DateTime<Utc>,
}

impl QuestionBank {
    /// Creates a bank.
    ///
    /// # Errors
    ///
    /// Returns `BankError::EmptyName` if the trimmed name is empty and
    /// `BankError::Empty` if there are no questions.
    pub fn new(
        id: BankId,
        name: impl Into<String>,
        questions: Vec<Question>,
        last_used: DateTime<Utc>,
    ) -> Result<Self, BankError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(BankError::EmptyName);
        }
        if questions.is_empty() {
            return Err(BankError::Empty);
        }

        Ok(Self {
            id,
            name,
            questions,
            last_used,
        })
    }

    #[must_use]
    pub fn id(&self) -> BankId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed bank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn last_used(&self) -> DateTime<Utc> {
        self.last_used
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_used = now;
    }
}
