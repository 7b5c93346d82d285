//! JSON shapes of the persisted slots.
//!
//! These mirror the domain types so the gateway can serialize without leaking
//! storage concerns into `quiz-core`. Field names use camelCase to stay
//! compatible with existing saved data.

use chrono::{DateTime, Utc};
use quiz_core::model::{
    Answer, BankError, BankId, OptionId, OptionIdError, ProgressError, ProgressState, Question,
    QuestionBank, QuestionError, QuestionId, QuestionOption,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A persisted record that no longer satisfies domain validation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecordError {
    #[error(transparent)]
    OptionId(#[from] OptionIdError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRecord {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: u64,
    pub text: String,
    pub options: Vec<OptionRecord>,
    pub answer: String,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: question.id().value(),
            text: question.text().to_owned(),
            options: question
                .options()
                .iter()
                .map(|opt| OptionRecord {
                    id: opt.id.to_string(),
                    text: opt.text.clone(),
                })
                .collect(),
            answer: question.answer().as_letters(),
        }
    }

    /// Convert the record back into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` if an option letter or the answer is invalid.
    pub fn into_question(self) -> Result<Question, RecordError> {
        let options = self
            .options
            .into_iter()
            .map(|opt| Ok(QuestionOption::new(opt.id.parse::<OptionId>()?, opt.text)))
            .collect::<Result<Vec<_>, RecordError>>()?;
        let answer = Answer::parse(&self.answer)?;
        Ok(Question::new(
            QuestionId::new(self.id),
            self.text,
            options,
            answer,
        )?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankRecord {
    pub id: u64,
    pub name: String,
    pub questions: Vec<QuestionRecord>,
    pub last_used: DateTime<Utc>,
}

impl BankRecord {
    #[must_use]
    pub fn from_bank(bank: &QuestionBank) -> Self {
        Self {
            id: bank.id().value(),
            name: bank.name().to_owned(),
            questions: bank
                .questions()
                .iter()
                .map(QuestionRecord::from_question)
                .collect(),
            last_used: bank.last_used(),
        }
    }

    /// Convert the record back into a domain `QuestionBank`.
    ///
    /// Invalid questions are skipped and counted in the second tuple field.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Bank` if nothing valid remains or the name is blank.
    pub fn into_bank(self) -> Result<(QuestionBank, usize), RecordError> {
        let mut skipped = 0;
        let mut questions = Vec::with_capacity(self.questions.len());
        for record in self.questions {
            match record.into_question() {
                Ok(question) => questions.push(question),
                Err(_) => skipped += 1,
            }
        }
        let bank = QuestionBank::new(BankId::new(self.id), self.name, questions, self.last_used)?;
        Ok((bank, skipped))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub correct_count: u64,
    pub total_answered: u64,
}

impl ProgressRecord {
    #[must_use]
    pub fn from_progress(progress: &ProgressState) -> Self {
        Self {
            correct_count: progress.correct_count(),
            total_answered: progress.total_answered(),
        }
    }

    /// # Errors
    ///
    /// Returns `RecordError::Progress` if the counters are inconsistent.
    pub fn into_progress(self) -> Result<ProgressState, RecordError> {
        Ok(ProgressState::from_counts(
            self.correct_count,
            self.total_answered,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    fn question() -> Question {
        Question::new(
            QuestionId::new(2),
            "下面符合保密工作规定的是（ ）。",
            vec![
                QuestionOption::new(OptionId::A, "one"),
                QuestionOption::new(OptionId::B, "two"),
                QuestionOption::new(OptionId::D, "four"),
            ],
            Answer::parse("DA").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn question_record_uses_flat_json_shape() {
        let json = serde_json::to_value(QuestionRecord::from_question(&question())).unwrap();
        assert_eq!(json["id"], 2);
        assert_eq!(json["answer"], "AD");
        assert_eq!(json["options"][2]["id"], "D");
        assert_eq!(json["options"][2]["text"], "four");
    }

    #[test]
    fn bank_record_uses_camel_case() {
        let bank = QuestionBank::new(BankId::new(7), "b.txt", vec![question()], fixed_now()).unwrap();
        let json = serde_json::to_value(BankRecord::from_bank(&bank)).unwrap();
        assert!(json.get("lastUsed").is_some());
        assert!(json.get("last_used").is_none());

        let (back, skipped) = serde_json::from_value::<BankRecord>(json)
            .unwrap()
            .into_bank()
            .unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(back, bank);
    }

    #[test]
    fn bank_record_skips_invalid_questions() {
        let mut record = BankRecord::from_bank(
            &QuestionBank::new(BankId::new(7), "b.txt", vec![question()], fixed_now()).unwrap(),
        );
        let mut broken = record.questions[0].clone();
        broken.answer = String::new();
        record.questions.push(broken);

        let (bank, skipped) = record.clone().into_bank().unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(skipped, 1);

        record.questions.remove(0);
        assert!(matches!(
            record.into_bank(),
            Err(RecordError::Bank(BankError::Empty))
        ));
    }

    #[test]
    fn progress_record_ignores_extra_fields() {
        let record: ProgressRecord =
            serde_json::from_str(r#"{"correctCount":3,"totalAnswered":4,"accuracy":75}"#).unwrap();
        let progress = record.into_progress().unwrap();
        assert_eq!(progress.accuracy(), 75);
    }
}
