use thiserror::Error;

use crate::model::bank::QuestionBank;
use crate::model::ids::BankId;
use crate::model::missed::IncorrectQuestionSet;
use crate::model::progress::ProgressState;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AppStateError {
    #[error("bank {0} not found")]
    BankNotFound(BankId),

    #[error("bank {0} already exists")]
    DuplicateBank(BankId),
}

/// Everything the application remembers between launches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    banks: Vec<QuestionBank>,
    selected: Option<BankId>,
    missed: IncorrectQuestionSet,
    progress: ProgressState,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles state from loaded parts. A selection that does not resolve is dropped.
    #[must_use]
    pub fn from_parts(
        banks: Vec<QuestionBank>,
        selected: Option<BankId>,
        missed: IncorrectQuestionSet,
        progress: ProgressState,
    ) -> Self {
        let mut state = Self {
            banks,
            selected: None,
            missed,
            progress,
        };
        state.set_selected(selected);
        state
    }

    #[must_use]
    pub fn banks(&self) -> &[QuestionBank] {
        &self.banks
    }

    #[must_use]
    pub fn bank(&self, id: BankId) -> Option<&QuestionBank> {
        self.banks.iter().find(|bank| bank.id() == id)
    }

    pub fn bank_mut(&mut self, id: BankId) -> Option<&mut QuestionBank> {
        self.banks.iter_mut().find(|bank| bank.id() == id)
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<BankId> {
        self.selected
    }

    #[must_use]
    pub fn current_bank(&self) -> Option<&QuestionBank> {
        self.selected.and_then(|id| self.bank(id))
    }

    /// Appends a bank and makes it the current one.
    ///
    /// # Errors
    ///
    /// Returns `AppStateError::DuplicateBank` if a bank with the same id exists.
    pub fn add_bank(&mut self, bank: QuestionBank) -> Result<&QuestionBank, AppStateError> {
        let id = bank.id();
        if self.bank(id).is_some() {
            return Err(AppStateError::DuplicateBank(id));
        }
        self.banks.push(bank);
        self.selected = Some(id);
        let idx = self.banks.len() - 1;
        Ok(&self.banks[idx])
    }

    /// # Errors
    ///
    /// Returns `AppStateError::BankNotFound` if no bank has this id.
    pub fn select_bank(&mut self, id: BankId) -> Result<&QuestionBank, AppStateError> {
        let idx = self
            .banks
            .iter()
            .position(|bank| bank.id() == id)
            .ok_or(AppStateError::BankNotFound(id))?;
        self.selected = Some(id);
        Ok(&self.banks[idx])
    }

    /// Removes a bank. If it was current, the first remaining bank becomes current.
    pub fn delete_bank(&mut self, id: BankId) -> Option<QuestionBank> {
        let idx = self.banks.iter().position(|bank| bank.id() == id)?;
        let removed = self.banks.remove(idx);
        if self.selected == Some(id) {
            self.selected = self.banks.first().map(QuestionBank::id);
        }
        Some(removed)
    }

    /// Sets the selection, resolving to `None` when the id is unknown.
    pub fn set_selected(&mut self, id: Option<BankId>) {
        self.selected = id.filter(|id| self.bank(*id).is_some());
    }

    pub fn replace_banks(&mut self, banks: Vec<QuestionBank>) {
        self.banks = banks;
        self.set_selected(self.selected);
    }

    #[must_use]
    pub fn missed(&self) -> &IncorrectQuestionSet {
        &self.missed
    }

    pub fn missed_mut(&mut self) -> &mut IncorrectQuestionSet {
        &mut self.missed
    }

    pub fn replace_missed(&mut self, missed: IncorrectQuestionSet) {
        self.missed = missed;
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressState {
        &mut self.progress
    }

    pub fn replace_progress(&mut self, progress: ProgressState) {
        self.progress = progress;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Answer, OptionId, Question, QuestionId, QuestionOption};
    use crate::time::fixed_now;

    fn bank(id: u64) -> QuestionBank {
        let q = Question::new(
            QuestionId::new(1),
            "Q",
            vec![QuestionOption::new(OptionId::A, "x")],
            Answer::parse("A").unwrap(),
        )
        .unwrap();
        QuestionBank::new(BankId::new(id), format!("bank-{id}.txt"), vec![q], fixed_now()).unwrap()
    }

    #[test]
    fn add_bank_selects_it() {
        let mut state = AppState::new();
        state.add_bank(bank(1)).unwrap();
        state.add_bank(bank(2)).unwrap();
        assert_eq!(state.current_bank().map(QuestionBank::id), Some(BankId::new(2)));
    }

    #[test]
    fn add_bank_rejects_duplicate_id() {
        let mut state = AppState::new();
        state.add_bank(bank(1)).unwrap();
        let err = state.add_bank(bank(1)).unwrap_err();
        assert_eq!(err, AppStateError::DuplicateBank(BankId::new(1)));
        assert_eq!(state.banks().len(), 1);
    }

    #[test]
    fn select_unknown_bank_fails_without_change() {
        let mut state = AppState::new();
        state.add_bank(bank(1)).unwrap();
        let err = state.select_bank(BankId::new(9)).unwrap_err();
        assert_eq!(err, AppStateError::BankNotFound(BankId::new(9)));
        assert_eq!(state.selected_id(), Some(BankId::new(1)));
    }

    #[test]
    fn deleting_current_bank_falls_back_to_first() {
        let mut state = AppState::new();
        state.add_bank(bank(1)).unwrap();
        state.add_bank(bank(2)).unwrap();
        state.add_bank(bank(3)).unwrap();

        assert!(state.delete_bank(BankId::new(3)).is_some());
        assert_eq!(state.selected_id(), Some(BankId::new(1)));

        state.select_bank(BankId::new(2)).unwrap();
        state.delete_bank(BankId::new(1));
        assert_eq!(state.selected_id(), Some(BankId::new(2)));

        state.delete_bank(BankId::new(2));
        assert_eq!(state.selected_id(), None);
        assert!(state.current_bank().is_none());
    }

    #[test]
    fn from_parts_drops_dangling_selection() {
        let state = AppState::from_parts(
            vec![bank(1)],
            Some(BankId::new(42)),
            IncorrectQuestionSet::new(),
            ProgressState::new(),
        );
        assert_eq!(state.selected_id(), None);
    }
}
