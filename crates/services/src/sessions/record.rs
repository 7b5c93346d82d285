use std::collections::BTreeSet;

use quiz_core::model::OptionId;

/// Outcome of checking one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub selected: BTreeSet<OptionId>,
    pub checked: bool,
    pub is_correct: bool,
}

/// Per-question state within a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnswerSlot {
    #[default]
    Unanswered,
    /// The user gave up and looked at the answer; not judged.
    Revealed,
    Answered(AnswerRecord),
}

impl AnswerSlot {
    /// True once the question is locked, either by an answer or a reveal.
    #[must_use]
    pub fn is_checked(&self) -> bool {
        !matches!(self, AnswerSlot::Unanswered)
    }

    #[must_use]
    pub fn record(&self) -> Option<&AnswerRecord> {
        match self {
            AnswerSlot::Answered(record) => Some(record),
            _ => None,
        }
    }
}
