use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OptionIdError {
    #[error("option id must be one of A, B, C, D (got {0:?})")]
    OutOfRange(char),

    #[error("option id must be a single letter (got {0:?})")]
    NotSingleLetter(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("answer cannot be empty")]
    EmptyAnswer,

    #[error("answer contains invalid character {0:?}")]
    InvalidAnswerChar(char),

    #[error("answer letter {0} does not match any option")]
    AnswerNotInOptions(OptionId),
}

//
// ─── OPTION ID ─────────────────────────────────────────────────────────────────
//

/// Letter identifying one of up to four options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionId {
    A,
    B,
    C,
    D,
}

impl OptionId {
    pub const ALL: [OptionId; 4] = [OptionId::A, OptionId::B, OptionId::C, OptionId::D];

    /// Maps an uppercase letter to an option id.
    ///
    /// # Errors
    ///
    /// Returns `OptionIdError::OutOfRange` for anything outside `A`-`D`.
    pub fn from_char(c: char) -> Result<Self, OptionIdError> {
        match c {
            'A' => Ok(Self::A),
            'B' => Ok(Self::B),
            'C' => Ok(Self::C),
            'D' => Ok(Self::D),
            other => Err(OptionIdError::OutOfRange(other)),
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl std::str::FromStr for OptionId {
    type Err = OptionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => Err(OptionIdError::NotSingleLetter(s.to_owned())),
        }
    }
}

//
// ─── OPTION ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOption {
    pub id: OptionId,
    pub text: String,
}

impl QuestionOption {
    #[must_use]
    pub fn new(id: OptionId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

//
// ─── ANSWER ────────────────────────────────────────────────────────────────────
//

/// Canonical answer of a question: a non-empty, unordered set of option letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Answer(BTreeSet<OptionId>);

impl Answer {
    /// Builds an answer from option letters, ignoring order and duplicates.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyAnswer` if no letters are given.
    pub fn new(letters: impl IntoIterator<Item = OptionId>) -> Result<Self, QuestionError> {
        let set: BTreeSet<OptionId> = letters.into_iter().collect();
        if set.is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }
        Ok(Self(set))
    }

    /// Parses letters such as `"AD"` or `"A,D"`. Commas and whitespace are ignored.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for characters outside `A`-`D` or an empty result.
    pub fn parse(raw: &str) -> Result<Self, QuestionError> {
        let mut letters = Vec::new();
        for c in raw.chars().filter(|c| *c != ',' && !c.is_whitespace()) {
            let id = OptionId::from_char(c).map_err(|_| QuestionError::InvalidAnswerChar(c))?;
            letters.push(id);
        }
        Self::new(letters)
    }

    #[must_use]
    pub fn letters(&self) -> &BTreeSet<OptionId> {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, id: OptionId) -> bool {
        self.0.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; an `Answer` cannot be constructed empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// More than one correct letter.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.0.len() > 1
    }

    /// Letters in ascending order, e.g. `"AD"`.
    #[must_use]
    pub fn as_letters(&self) -> String {
        self.0.iter().map(|id| id.as_char()).collect()
    }

    /// Compares a selection against this answer as sets.
    #[must_use]
    pub fn matches(&self, selected: &[OptionId]) -> bool {
        let picked: BTreeSet<OptionId> = selected.iter().copied().collect();
        picked == self.0
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_letters())
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<QuestionOption>,
    answer: Answer,
}

impl Question {
    /// Creates a question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::AnswerNotInOptions` if the answer names a letter
    /// that is not among `options`.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<QuestionOption>,
        answer: Answer,
    ) -> Result<Self, QuestionError> {
        if let Some(missing) = answer
            .letters()
            .iter()
            .find(|letter| !options.iter().any(|opt| opt.id == **letter))
        {
            return Err(QuestionError::AnswerNotInOptions(*missing));
        }

        Ok(Self {
            id,
            text: text.into(),
            options,
            answer,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[QuestionOption] {
        &self.options
    }

    #[must_use]
    pub fn answer(&self) -> &Answer {
        &self.answer
    }

    /// True when more than one option is correct; front-ends use checkboxes then.
    #[must_use]
    pub fn is_multiple_choice(&self) -> bool {
        self.answer.is_multiple()
    }

    #[must_use]
    pub fn has_option(&self, id: OptionId) -> bool {
        self.options.iter().any(|opt| opt.id == id)
    }

    /// Order and duplicate picks never affect the result.
    #[must_use]
    pub fn evaluate(&self, selected: &[OptionId]) -> bool {
        self.answer.matches(selected)
    }

    /// Composite identity used by the missed-question set.
    #[must_use]
    pub fn dedup_key(&self) -> (QuestionId, &str) {
        (self.id, self.text.as_str())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn two_option_question(answer: &str) -> Question {
        Question::new(
            QuestionId::new(1),
            "Q1",
            vec![
                QuestionOption::new(OptionId::A, "x"),
                QuestionOption::new(OptionId::B, "y"),
            ],
            Answer::parse(answer).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn option_id_rejects_lowercase_and_out_of_range() {
        assert_eq!(OptionId::from_char('a'), Err(OptionIdError::OutOfRange('a')));
        assert_eq!(OptionId::from_char('E'), Err(OptionIdError::OutOfRange('E')));
        assert_eq!("C".parse::<OptionId>(), Ok(OptionId::C));
        assert!("AB".parse::<OptionId>().is_err());
    }

    #[test]
    fn answer_parse_strips_commas_and_sorts() {
        let answer = Answer::parse("D, A").unwrap();
        assert_eq!(answer.as_letters(), "AD");
        assert!(answer.is_multiple());
    }

    #[test]
    fn answer_rejects_empty_and_invalid() {
        assert_eq!(Answer::parse(""), Err(QuestionError::EmptyAnswer));
        assert_eq!(Answer::parse(",,"), Err(QuestionError::EmptyAnswer));
        assert_eq!(Answer::parse("AX"), Err(QuestionError::InvalidAnswerChar('X')));
    }

    #[test]
    fn question_rejects_answer_outside_options() {
        let err = Question::new(
            QuestionId::new(1),
            "Q",
            vec![QuestionOption::new(OptionId::A, "x")],
            Answer::parse("AC").unwrap(),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::AnswerNotInOptions(OptionId::C));
    }

    #[test]
    fn evaluate_compares_as_sets() {
        let q = two_option_question("A,B");
        assert!(q.evaluate(&[OptionId::B, OptionId::A]));
        assert!(q.evaluate(&[OptionId::A, OptionId::B, OptionId::A]));
        assert!(!q.evaluate(&[OptionId::A]));

        let single = two_option_question("A");
        assert!(single.evaluate(&[OptionId::A]));
        assert!(!single.evaluate(&[OptionId::B]));
        assert!(!single.is_multiple_choice());
    }

    #[test]
    fn evaluate_matches_set_equality_for_every_selection() {
        let q = two_option_question("AB");
        let all = [OptionId::A, OptionId::B, OptionId::C, OptionId::D];
        for mask in 0u8..16 {
            let picked: Vec<OptionId> = all
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, id)| *id)
                .collect();
            let expected = picked.iter().copied().collect::<BTreeSet<_>>()
                == q.answer().letters().clone();
            assert_eq!(q.evaluate(&picked), expected, "mask {mask:04b}");
        }
    }
}
