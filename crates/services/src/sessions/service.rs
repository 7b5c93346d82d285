use std::collections::BTreeSet;
use std::fmt;

use quiz_core::model::{Answer, AppState, OptionId, Question, QuestionBank};
use tracing::debug;

use super::progress::SessionProgress;
use super::record::{AnswerRecord, AnswerSlot};
use super::summary::RunSummary;
use crate::error::SessionError;
use crate::progress_tracker;

//
// ─── MODE / DIRECTION ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Pass over a bank; answers count toward lifetime accuracy.
    Practice,
    /// Pass over the missed-question set; accuracy is left alone.
    Review,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunStatus {
    Active,
    Finished,
}

//
// ─── SUBMIT OUTCOME ────────────────────────────────────────────────────────────
//

/// What happened when an answer was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub index: usize,
    pub record: AnswerRecord,
    pub correct_answer: Answer,
    /// The answer moved lifetime progress. Never set in review runs.
    pub counted_in_progress: bool,
    /// The question was newly added to the missed set.
    pub added_to_missed: bool,
    /// Submitting on the last question finishes the run.
    pub run_finished: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory practice or review run.
///
/// Owns a snapshot of its questions so later changes to banks or the missed
/// set do not affect a run in progress. Side effects on lifetime progress and
/// the missed set go through the `AppState` passed to `submit_answer`.
pub struct SessionService {
    mode: RunMode,
    source: String,
    questions: Vec<Question>,
    current: usize,
    slots: Vec<AnswerSlot>,
    status: RunStatus,
}

impl SessionService {
    /// Start a practice run over the selected bank.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoBankSelected` if `bank` is `None`.
    pub fn start_practice(bank: Option<&QuestionBank>) -> Result<Self, SessionError> {
        let bank = bank.ok_or(SessionError::NoBankSelected)?;
        debug!(bank_id = %bank.id(), questions = bank.len(), "starting practice run");
        Self::new(RunMode::Practice, bank.name(), bank.questions().to_vec())
            .ok_or(SessionError::NoBankSelected)
    }

    /// Start a review run over a snapshot of the missed-question set.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoMissedQuestions` if the set is empty.
    pub fn start_review(state: &AppState) -> Result<Self, SessionError> {
        let questions = state.missed().snapshot();
        debug!(questions = questions.len(), "starting review run");
        Self::new(RunMode::Review, "missed questions", questions)
            .ok_or(SessionError::NoMissedQuestions)
    }

    fn new(mode: RunMode, source: &str, questions: Vec<Question>) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }
        let slots = vec![AnswerSlot::Unanswered; questions.len()];
        Some(Self {
            mode,
            source: source.to_owned(),
            questions,
            current: 0,
            slots,
            status: RunStatus::Active,
        })
    }

    #[must_use]
    pub fn mode(&self) -> RunMode {
        self.mode
    }

    #[must_use]
    pub fn is_review(&self) -> bool {
        self.mode == RunMode::Review
    }

    /// Bank name, or a fixed label for review runs.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn current_slot(&self) -> &AnswerSlot {
        &self.slots[self.current]
    }

    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&AnswerSlot> {
        self.slots.get(index)
    }

    #[must_use]
    pub fn is_multiple_choice(&self) -> bool {
        self.current_question().is_multiple_choice()
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == RunStatus::Finished
    }

    /// Number of questions with a judged answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|s| s.record().is_some()).count()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let answered = self.answered_count();
        SessionProgress {
            total: self.total_questions(),
            answered,
            remaining: self.total_questions().saturating_sub(answered),
            is_complete: self.is_complete(),
        }
    }

    /// Questions answered wrong in this run, in run order.
    #[must_use]
    pub fn incorrect_questions(&self) -> Vec<&Question> {
        self.questions
            .iter()
            .zip(&self.slots)
            .filter(|(_, slot)| slot.record().is_some_and(|r| !r.is_correct))
            .map(|(question, _)| question)
            .collect()
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        match self.status {
            RunStatus::Active => Ok(()),
            RunStatus::Finished => Err(SessionError::Finished),
        }
    }

    fn ensure_unchecked(&self) -> Result<(), SessionError> {
        if self.current_slot().is_checked() {
            return Err(SessionError::AlreadyChecked);
        }
        Ok(())
    }

    /// Check the selected options against the current question.
    ///
    /// Practice answers count toward lifetime progress and wrong practice
    /// answers join the missed set; review answers touch neither. Submitting
    /// on the last question finishes the run.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished`, `AlreadyChecked`, `EmptySelection` or
    /// `UnknownOption` without changing any state.
    pub fn submit_answer(
        &mut self,
        state: &mut AppState,
        selected: &[OptionId],
    ) -> Result<SubmitOutcome, SessionError> {
        self.ensure_active()?;
        self.ensure_unchecked()?;
        if selected.is_empty() {
            return Err(SessionError::EmptySelection);
        }
        let question = self.current_question();
        if let Some(unknown) = selected.iter().find(|id| !question.has_option(**id)) {
            return Err(SessionError::UnknownOption(*unknown));
        }

        let is_correct = question.evaluate(selected);
        let correct_answer = question.answer().clone();
        let is_review = self.is_review();

        progress_tracker::record_run(
            state.progress_mut(),
            u64::from(is_correct),
            1,
            is_review,
        )?;
        let added_to_missed =
            !is_correct && !is_review && state.missed_mut().insert(question.clone());

        let record = AnswerRecord {
            selected: selected.iter().copied().collect::<BTreeSet<_>>(),
            checked: true,
            is_correct,
        };
        let index = self.current;
        self.slots[index] = AnswerSlot::Answered(record.clone());

        debug!(
            index,
            is_correct,
            added_to_missed,
            mode = ?self.mode,
            "answer checked"
        );

        if self.is_last() {
            self.status = RunStatus::Finished;
        }

        Ok(SubmitOutcome {
            index,
            record,
            correct_answer,
            counted_in_progress: !is_review,
            added_to_missed,
            run_finished: self.is_complete(),
        })
    }

    /// Show the correct answer without judging; lifetime progress and the
    /// missed set are left alone.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished` or `AlreadyChecked`.
    pub fn reveal_answer(&mut self) -> Result<&Answer, SessionError> {
        self.ensure_active()?;
        self.ensure_unchecked()?;
        self.slots[self.current] = AnswerSlot::Revealed;
        debug!(index = self.current, "answer revealed");
        Ok(self.questions[self.current].answer())
    }

    /// Move the cursor. Returns `false` when already at the edge.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Finished` once the run is over.
    pub fn advance(&mut self, direction: Direction) -> Result<bool, SessionError> {
        self.ensure_active()?;
        let moved = match direction {
            Direction::Prev if !self.is_first() => {
                self.current -= 1;
                true
            }
            Direction::Next if !self.is_last() => {
                self.current += 1;
                true
            }
            _ => false,
        };
        Ok(moved)
    }

    /// End the run. Calling it again returns the same summary.
    pub fn finish(&mut self) -> RunSummary {
        if self.status == RunStatus::Active {
            debug!(mode = ?self.mode, "run finished");
            self.status = RunStatus::Finished;
        }
        self.summary()
    }

    /// Results aggregated over this run's answers only.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let mut correct = 0;
        let mut incorrect = 0;
        let mut revealed = 0;
        for slot in &self.slots {
            match slot {
                AnswerSlot::Answered(record) if record.is_correct => correct += 1,
                AnswerSlot::Answered(_) => incorrect += 1,
                AnswerSlot::Revealed => revealed += 1,
                AnswerSlot::Unanswered => {}
            }
        }
        RunSummary::new(
            self.mode,
            self.total_questions(),
            correct,
            incorrect,
            revealed,
        )
    }
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService")
            .field("mode", &self.mode)
            .field("source", &self.source)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
