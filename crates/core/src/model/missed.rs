use crate::model::question::Question;

/// Deduplicated, append-only log of questions the user answered wrong.
///
/// Entries are keyed by `(id, text)`; a question already present is never re-added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncorrectQuestionSet {
    entries: Vec<Question>,
}

impl IncorrectQuestionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from persisted entries, dropping later duplicates.
    #[must_use]
    pub fn from_questions(questions: impl IntoIterator<Item = Question>) -> Self {
        let mut set = Self::new();
        for question in questions {
            set.insert(question);
        }
        set
    }

    /// Appends the question unless its `(id, text)` is already present.
    ///
    /// Returns `true` if the question was added.
    pub fn insert(&mut self, question: Question) -> bool {
        if self.contains(&question) {
            return false;
        }
        self.entries.push(question);
        true
    }

    #[must_use]
    pub fn contains(&self, question: &Question) -> bool {
        let key = question.dedup_key();
        self.entries.iter().any(|q| q.dedup_key() == key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Question] {
        &self.entries
    }

    /// Independent copy, so later inserts do not leak into a running review.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Question> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Answer, OptionId, QuestionId, QuestionOption};

    fn question(id: u64, text: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            text,
            vec![
                QuestionOption::new(OptionId::A, "x"),
                QuestionOption::new(OptionId::B, "y"),
            ],
            Answer::parse("A").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn insert_dedups_on_id_and_text() {
        let mut set = IncorrectQuestionSet::new();
        assert!(set.insert(question(1, "Q1")));
        assert!(!set.insert(question(1, "Q1")));
        // same id from a different bank is a different question
        assert!(set.insert(question(1, "Other")));
        assert!(set.insert(question(2, "Q1")));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn from_questions_drops_duplicates_and_keeps_order() {
        let set = IncorrectQuestionSet::from_questions(vec![
            question(2, "B"),
            question(1, "A"),
            question(2, "B"),
        ]);
        let ids: Vec<u64> = set.as_slice().iter().map(|q| q.id().value()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn snapshot_is_detached() {
        let mut set = IncorrectQuestionSet::new();
        set.insert(question(1, "Q1"));
        let snap = set.snapshot();
        set.insert(question(2, "Q2"));
        assert_eq!(snap.len(), 1);
        assert_eq!(set.len(), 2);
    }
}
